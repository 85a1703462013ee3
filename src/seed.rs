//! Default articles used to bootstrap an empty store.

use chrono::{DateTime, TimeZone, Utc};

use crate::{Article, ArticleDraft};

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// The sample collection written on first run, newest first.
pub fn sample_articles() -> Vec<Article> {
    vec![
        Article::with_id(
            "1",
            utc(2023, 10, 26, 10, 0),
            ArticleDraft {
                title: "Bitcoin Surges Past $70,000 in Historic Rally".to_string(),
                content: "## A New Era for Digital Gold\n\n\
                    Bitcoin, the world's leading cryptocurrency, has once again shattered expectations by soaring past the **$70,000** mark. This incredible rally has been fueled by a combination of institutional adoption, positive regulatory news, and growing retail interest.\n\n\
                    ### Key Drivers of the Rally\n\n\
                    *   **Institutional Investment:** Major financial institutions are now offering Bitcoin ETFs, making it easier for traditional investors to gain exposure.\n\
                    *   **Halving Event:** The recent Bitcoin halving event has reduced the rate of new coin creation, increasing scarcity.\n\
                    *   **Global Economic Uncertainty:** Investors are increasingly turning to Bitcoin as a hedge against inflation and geopolitical instability.\n\n\
                    Analysts predict that this is just the beginning, with some forecasting a price target of over $100,000 by the end of the year. The crypto market remains volatile, but the long-term outlook for Bitcoin appears stronger than ever."
                    .to_string(),
                author: "Crypto Analyst".to_string(),
                image_url: Some("https://picsum.photos/seed/1/1200/600".to_string()),
            },
        ),
        Article::with_id(
            "2",
            utc(2023, 10, 25, 14, 30),
            ArticleDraft {
                title: "Ethereum \"Dencun\" Upgrade Goes Live, Slashing Gas Fees".to_string(),
                content: "## A Scalability Breakthrough\n\n\
                    The highly anticipated \"Dencun\" upgrade for the Ethereum network has successfully launched, introducing proto-danksharding (EIP-4844). This upgrade is a game-changer for Ethereum's scalability, significantly reducing transaction fees for Layer 2 rollups.\n\n\
                    ### What are Blobs?\n\n\
                    The core of the upgrade is the introduction of \"blobs,\" a new way to carry data on the blockchain that is cheaper than traditional calldata. This makes transactions on Layer 2 solutions like Arbitrum and Optimism up to 10x cheaper for users.\n\n\
                    This is a major step towards making Ethereum a more accessible and user-friendly platform for decentralized applications (dApps) and their users."
                    .to_string(),
                author: "Vitalik B.".to_string(),
                image_url: Some("https://picsum.photos/seed/2/1200/600".to_string()),
            },
        ),
    ]
}
