//! Static catalog of CCL policy briefs a writer can anchor a letter on.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Brief {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub dos: &'static [&'static str],
    pub donts: &'static [&'static str],
    pub key_points: &'static [&'static str],
}

pub const BRIEFS: &[Brief] = &[
    Brief {
        id: "carbon-pricing",
        title: "Pricing Pollution",
        summary: "Price carbon economy-wide and return revenue to households to cut emissions efficiently.",
        dos: &[
            "Be respectful and solution-focused",
            "Reference local economy/health/air benefits",
        ],
        donts: &["No doom or personal attacks", "Avoid long lists of policies"],
        key_points: &[
            "Market signal reduces emissions at lowest cost",
            "Dividends can protect low- and middle-income families",
            "Predictable price drives clean investment",
        ],
    },
    Brief {
        id: "permitting",
        title: "Clean Energy Permitting Reform",
        summary: "Speed clean projects and transmission while maintaining strong environmental protections.",
        dos: &[
            "Emphasize faster build-out of clean energy",
            "Mention transmission & community input",
        ],
        donts: &["Don't frame as deregulation for fossil expansion"],
        key_points: &[
            "Modernize reviews to cut delays",
            "Prioritize big grid projects",
            "Pair speed with community benefits",
        ],
    },
    Brief {
        id: "building-electrification",
        title: "Building Electrification & Efficiency",
        summary: "Cut bills and pollution with heat pumps, induction, and efficiency upgrades.",
        dos: &["Highlight comfort, savings, health"],
        donts: &["Avoid tech shaming"],
        key_points: &[
            "Heat pumps work in cold climates",
            "Incentives lower upfront costs",
            "Efficiency first reduces load",
        ],
    },
    Brief {
        id: "healthy-forests",
        title: "Healthy Forests",
        summary: "Improve forest health and resilience while storing carbon and protecting communities.",
        dos: &["Talk wildfire risk, local stewardship"],
        donts: &["Avoid overselling carbon alone"],
        key_points: &[
            "Proactive thinning & prescribed fire",
            "Support restoration & rural jobs",
            "Guard old growth and biodiversity",
        ],
    },
];

pub fn find_brief(id: &str) -> Option<&'static Brief> {
    BRIEFS.iter().find(|b| b.id == id)
}

impl Brief {
    /// Brief guidance formatted for the outline prompt.
    pub fn prompt_block(&self) -> String {
        [
            format!("Brief: {}", self.title),
            format!("Summary: {}", self.summary),
            format!("Do: {}", self.dos.join(" • ")),
            format!("Avoid: {}", self.donts.join(" • ")),
        ]
        .join("\n")
    }
}
