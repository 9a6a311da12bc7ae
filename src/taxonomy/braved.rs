//! BRAVED: Bitcoin, Real world assets, AI, VR/AR, Emotional intelligence, Decentralization.

use super::{Component, Framework};

pub const KEY: &str = "braved";

pub fn framework() -> Framework {
    Framework::new(
        KEY,
        "BRAVED",
        vec![
            Component::new(
                "B",
                "Bitcoin & Cryptocurrency",
                &["bitcoin", "crypto", "blockchain", "digital assets", "trading", "defi", "web3"],
                "Understanding Bitcoin, cryptocurrency markets, and digital asset fundamentals",
            ),
            Component::new(
                "R",
                "Real World Assets & Web3 Gaming",
                &[
                    "nft",
                    "gaming",
                    "real estate",
                    "entertainment",
                    "digital ownership",
                    "web3 gaming",
                    "metaverse",
                ],
                "Real world asset tokenization, NFTs, and Web3 gaming ecosystems",
            ),
            Component::new(
                "A",
                "AI & AI Agents",
                &[
                    "artificial intelligence",
                    "ai agents",
                    "prompting",
                    "machine learning",
                    "automation",
                    "ai tools",
                ],
                "AI technologies, agent systems, and effective AI prompting techniques",
            ),
            Component::new(
                "V",
                "VR/AR & Spatial Computing",
                &[
                    "virtual reality",
                    "augmented reality",
                    "spatial computing",
                    "metaverse",
                    "3d",
                    "immersive",
                ],
                "Virtual and augmented reality technologies, spatial computing, and metaverse development",
            ),
            Component::new(
                "E",
                "Emotional Intelligence",
                &[
                    "trading psychology",
                    "work-life balance",
                    "emotional control",
                    "mindfulness",
                    "stress management",
                ],
                "Emotional intelligence in trading, work-life balance, and personal development",
            ),
            Component::new(
                "D",
                "Decentralization & Cryptography",
                &[
                    "decentralization",
                    "cryptography",
                    "zero knowledge",
                    "zk proofs",
                    "privacy",
                    "security",
                ],
                "Decentralized systems, cryptography, and zero-knowledge proof technologies",
            ),
        ],
    )
    .expect("built-in BRAVED definition should be valid")
}
