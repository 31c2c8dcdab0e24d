//! Wiring from loaded [`Settings`] to the objects a run needs.
use unfollow_config::Settings;
use unfollow_deleter::SweepOptions;
use unfollow_http::{HttpError, OAuth1Signer};
use unfollow_social::twitter::TwitterApi;

/// Authenticated API handle for the configured account.
pub fn build_client(settings: &Settings) -> Result<TwitterApi, HttpError> {
    let creds = &settings.credentials;
    let signer = OAuth1Signer::new(
        &creds.consumer_key,
        &creds.consumer_secret,
        &creds.access_token,
        &creds.access_secret,
    );
    TwitterApi::new(&settings.api_url, signer, settings.timeout())
}

pub fn sweep_options(settings: &Settings) -> SweepOptions {
    SweepOptions {
        max_pages: settings.max_pages,
        ..SweepOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfollow_config::Credentials;

    fn settings(api_url: &str) -> Settings {
        Settings {
            credentials: Credentials {
                consumer_key: "ck".into(),
                consumer_secret: "cs".into(),
                access_token: "at".into(),
                access_secret: "as".into(),
            },
            api_url: api_url.into(),
            timeout_secs: 3,
            max_pages: 12,
        }
    }

    #[test]
    fn options_carry_page_guard() {
        let opts = sweep_options(&settings("https://api.twitter.com"));
        assert_eq!(opts.max_pages, 12);
        assert_eq!(opts.page_size, unfollow_deleter::PAGE_SIZE);
        assert_eq!(opts.follow_cap, unfollow_deleter::FOLLOW_CAP);
    }

    #[test]
    fn bad_api_url_is_rejected() {
        assert!(matches!(
            build_client(&settings("not a url")),
            Err(HttpError::Url(_))
        ));
        assert!(build_client(&settings("http://127.0.0.1:8080")).is_ok());
    }
}
