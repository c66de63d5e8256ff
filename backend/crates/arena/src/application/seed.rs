//! Seed Challenges
//!
//! The two built-in demo challenges. They are always present in the merged
//! collection, even with an empty backend, and cannot be edited or deleted.

use chrono::NaiveDate;
use kernel::id::ChallengeId;

use crate::domain::entities::{Challenge, DEFAULT_LOGO_URL, Resource};
use crate::domain::value_objects::{ChallengeStatus, Difficulty};

pub const SEED_CHALLENGE_IDS: [&str; 2] = ["1", "2"];

pub fn is_seed_id(id: &ChallengeId) -> bool {
    SEED_CHALLENGE_IDS.contains(&id.as_str())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn placeholder_resources(names: &[&str]) -> Vec<Resource> {
    names
        .iter()
        .map(|name| Resource {
            name: name.to_string(),
            link: "#".to_string(),
        })
        .collect()
}

pub fn seed_challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: ChallengeId::from(SEED_CHALLENGE_IDS[0]),
            title: "Autonomous AI Assistant for Marketing Teams".to_string(),
            sponsor_display_name: "MarketGenius Inc.".to_string(),
            description: "Build an AI that can generate marketing copy, analyze campaign \
                performance, and suggest improvements based on data insights. The solution \
                should be able to learn from feedback and adapt its suggestions over time."
                .to_string(),
            deadline: date(2025, 6, 15),
            status: ChallengeStatus::Active,
            difficulty: Difficulty::Intermediate,
            logo_url: DEFAULT_LOGO_URL.to_string(),
            prize_text: "$5,000".to_string(),
            category: Some("NLP".to_string()),
            requirements: lines(&[
                "Solution must be capable of generating marketing copy for social media, email, and web",
                "Must include performance analysis tools that provide actionable insights",
                "Should learn from user feedback to improve future suggestions",
                "API documentation for integration with existing marketing tools",
                "Ability to handle multiple marketing channels and campaign types",
            ]),
            evaluation_criteria: lines(&[
                "Quality and relevance of generated content (30%)",
                "Accuracy of performance analysis (25%)",
                "Adaptability and learning capabilities (25%)",
                "API design and integration capabilities (10%)",
                "User experience and interface design (10%)",
            ]),
            resources: placeholder_resources(&[
                "Sample marketing data",
                "API documentation template",
                "Evaluation criteria details",
            ]),
            sponsor_id: None,
            submissions: Vec::new(),
        },
        Challenge {
            id: ChallengeId::from(SEED_CHALLENGE_IDS[1]),
            title: "Healthcare Diagnostic Image Analysis".to_string(),
            sponsor_display_name: "MediTech Solutions".to_string(),
            description: "Develop an algorithm to identify anomalies in medical imaging with \
                high accuracy. The solution should work across X-rays, CT scans, and MRIs to \
                flag potential issues for medical professionals."
                .to_string(),
            deadline: date(2025, 7, 1),
            status: ChallengeStatus::Active,
            difficulty: Difficulty::Advanced,
            logo_url: DEFAULT_LOGO_URL.to_string(),
            prize_text: "$8,000".to_string(),
            category: Some("Computer Vision".to_string()),
            requirements: lines(&[
                "Support for X-ray, CT scan, and MRI image formats",
                "Ability to identify and highlight potential anomalies",
                "False positive rate below industry standard",
                "Documentation on model architecture and training process",
                "Interface for medical professionals to review flagged issues",
            ]),
            evaluation_criteria: lines(&[
                "Accuracy of anomaly detection (40%)",
                "False positive/negative rates (30%)",
                "Processing speed and efficiency (10%)",
                "Ease of use for medical professionals (10%)",
                "Documentation quality (10%)",
            ]),
            resources: placeholder_resources(&[
                "Sample anonymized medical images",
                "Medical imaging standards documentation",
                "Evaluation metrics details",
            ]),
            sponsor_id: None,
            submissions: Vec::new(),
        },
    ]
}
