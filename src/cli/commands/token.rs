use anyhow::{bail, Context};
use chrono::Utc;

use super::token_service;
use crate::cli::TokenArgs;
use crate::config::AuthConfig;
use crate::core::tokens::{RefreshOutcome, TokenRecord, TokenStatus};

pub async fn run(args: TokenArgs) -> anyhow::Result<()> {
    let auth = AuthConfig::from_env().context("OAuth client is not configured")?;
    let tokens = token_service(&auth, reqwest::Client::new());

    let Some(mut record) = tokens.load().await else {
        bail!(
            "No token found at {}. Run `blogger-autopost authorize` first.",
            tokens.token_location()
        );
    };

    println!("🔑 Token file: {}", tokens.token_location());
    println!("{}", describe(&record));

    if args.refresh {
        match tokens.refresh(&mut record).await {
            RefreshOutcome::Renewed => {
                println!("✅ Access token refreshed.");
                println!("{}", describe(&record));
            }
            RefreshOutcome::NotAttempted => {
                bail!("No refresh token stored; run `blogger-autopost authorize` again.")
            }
            RefreshOutcome::Failed(reason) => bail!("Token refresh failed: {}", reason),
        }
    }

    Ok(())
}

fn describe(record: &TokenRecord) -> String {
    let status = match TokenStatus::of(Some(record), Utc::now()) {
        TokenStatus::Valid { remaining } => {
            format!("valid for {} more minute(s)", remaining.num_minutes())
        }
        TokenStatus::Expired { refreshable: true } => "expired (refreshable)".to_string(),
        TokenStatus::Expired { refreshable: false } => {
            "expired (no refresh token, re-authorize)".to_string()
        }
        TokenStatus::Missing => "missing".to_string(),
    };

    format!(
        "   access token: {}\n   expires at:   {}\n   status:       {}",
        record.masked_access_token(),
        record.expires_at.to_rfc3339(),
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::token_service::tests::stored_record;

    #[test]
    fn description_masks_the_token() {
        let text = describe(&stored_record(Some("1//r")));

        assert!(text.contains("ya29.old..."));
        assert!(text.contains("expired (refreshable)"));
    }
}
