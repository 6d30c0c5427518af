pub mod coach;
pub mod letter;
