//! BALAJIS: Build, Attention, Leverage, Algorithms, Joy, Influence, Skills.
//!
//! Attention and Algorithms share an initial; Algorithms uses the code "AL".

use super::{Component, Framework};

pub const KEY: &str = "balajis";

pub fn framework() -> Framework {
    Framework::new(
        KEY,
        "BALAJIS",
        vec![
            Component::new(
                "B",
                "Build",
                &["creation", "development", "construction", "making", "building", "projects"],
                "Creating and developing tangible or digital products and solutions",
            ),
            Component::new(
                "A",
                "Attention",
                &["focus", "concentration", "mindfulness", "awareness", "presence", "mindset"],
                "Developing focus, mindfulness, and present-moment awareness",
            ),
            Component::new(
                "L",
                "Leverage",
                &["efficiency", "optimization", "automation", "systems", "scaling", "multipliers"],
                "Creating systems and processes that multiply your impact and efficiency",
            ),
            Component::new(
                "AL",
                "Algorithms",
                &["patterns", "systems", "processes", "automation", "optimization", "efficiency"],
                "Understanding and implementing systematic approaches to problem-solving",
            ),
            Component::new(
                "J",
                "Joy",
                &["happiness", "fulfillment", "passion", "purpose", "meaning", "enjoyment"],
                "Finding joy and fulfillment in your work and life",
            ),
            Component::new(
                "I",
                "Influence",
                &[
                    "leadership",
                    "impact",
                    "persuasion",
                    "communication",
                    "networking",
                    "relationships",
                ],
                "Building influence and making a positive impact on others",
            ),
            Component::new(
                "S",
                "Skills",
                &["expertise", "competence", "mastery", "learning", "development", "capabilities"],
                "Developing and mastering essential skills for success",
            ),
        ],
    )
    .expect("built-in BALAJIS definition should be valid")
}
