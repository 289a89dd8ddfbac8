use super::types::Orientation;
use crate::{ScreenConfig, UnsplashConfig};
use rand::{Rng, seq::IndexedRandom};
use url::Url;

/// One `/photos/random` request, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRequest {
    pub client_id: String,
    pub collections: String,
    pub orientation: Orientation,
    pub size: Option<(u32, u32)>,
    pub query: Option<String>,
}

impl PhotoRequest {
    /// Picks at most one search term uniformly from `config.queries`.
    pub fn from_config<R: Rng + ?Sized>(
        config: &UnsplashConfig,
        screen: &ScreenConfig,
        rng: &mut R,
    ) -> Self {
        let size = config
            .resize_for_screen
            .then_some((screen.width, screen.height));

        Self {
            client_id: config.access_key.clone(),
            collections: config.collections.clone(),
            orientation: config.orientation,
            size,
            query: config.queries.choose(rng).cloned(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("client_id", self.client_id.clone()),
            ("collections", self.collections.clone()),
            ("orientation", self.orientation.to_string()),
        ];

        if let Some((width, height)) = self.size {
            pairs.push(("w", width.to_string()));
            pairs.push(("h", height.to_string()));
        }

        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }

        pairs
    }

    pub fn to_url(&self, api_base: &str) -> Result<Url, url::ParseError> {
        let base = if api_base.ends_with('/') {
            Url::parse(api_base)?
        } else {
            Url::parse(&format!("{}/", api_base))?
        };

        let mut url = base.join("photos/random")?;
        url.query_pairs_mut().extend_pairs(self.query_pairs());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn config(queries: &[&str]) -> UnsplashConfig {
        UnsplashConfig {
            access_key: "key123".to_string(),
            collections: "1053828,3330445".to_string(),
            queries: queries.iter().map(|q| q.to_string()).collect(),
            orientation: Orientation::Landscape,
            resize_for_screen: false,
            ..UnsplashConfig::default()
        }
    }

    fn screen() -> ScreenConfig {
        ScreenConfig {
            width: 1080,
            height: 1920,
        }
    }

    #[test]
    fn test_empty_queries_never_send_query() {
        let config = config(&[]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let request = PhotoRequest::from_config(&config, &screen(), &mut rng);
            assert!(request.query.is_none());
            assert!(request.query_pairs().iter().all(|(name, _)| *name != "query"));
        }
    }

    #[test]
    fn test_exactly_one_query_from_list() {
        let queries = ["mountains", "ocean waves", "forest"];
        let config = config(&queries);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let request = PhotoRequest::from_config(&config, &screen(), &mut rng);
            let pairs = request.query_pairs();
            let sent: Vec<_> = pairs.iter().filter(|(name, _)| *name == "query").collect();
            assert_eq!(sent.len(), 1);
            assert!(queries.contains(&sent[0].1.as_str()));
            seen.insert(sent[0].1.clone());
        }

        // 200 uniform draws from 3 terms hit every term
        assert_eq!(seen.len(), queries.len());
    }

    #[test]
    fn test_resize_adds_screen_dimensions() {
        let mut config = config(&[]);
        let mut rng = StdRng::seed_from_u64(1);

        let request = PhotoRequest::from_config(&config, &screen(), &mut rng);
        assert!(request.size.is_none());
        assert!(!request.query_pairs().iter().any(|(name, _)| *name == "w" || *name == "h"));

        config.resize_for_screen = true;
        let request = PhotoRequest::from_config(&config, &screen(), &mut rng);
        let pairs = request.query_pairs();
        assert!(pairs.contains(&("w", "1080".to_string())));
        assert!(pairs.contains(&("h", "1920".to_string())));
    }

    #[test]
    fn test_url_layout() {
        let request = PhotoRequest {
            client_id: "abc".to_string(),
            collections: String::new(),
            orientation: Orientation::Portrait,
            size: Some((800, 600)),
            query: Some("city lights".to_string()),
        };

        let url = request.to_url("https://api.unsplash.com").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.unsplash.com/photos/random?client_id=abc&collections=&orientation=portrait&w=800&h=600&query=city+lights"
        );

        let nested = request.to_url("http://127.0.0.1:9000/proxy/").unwrap();
        assert_eq!(nested.path(), "/proxy/photos/random");
    }
}
