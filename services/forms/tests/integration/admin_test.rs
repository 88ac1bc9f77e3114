use chrono::{Duration, Utc};
use serde_json::{Map, json};

use tfm_forms::domain::repository::SubmissionRepository;
use tfm_forms::domain::types::NewSubmission;
use tfm_forms::usecase::admin::{ListSitesUseCase, ListSubmissionsUseCase};

use crate::helpers::{MockSiteRepo, MockSubmissionRepo, test_site};

fn submission(site_id: &str, minutes_ago: i64) -> NewSubmission {
    let mut data = Map::new();
    data.insert("name".to_owned(), json!("Ada"));
    NewSubmission {
        site_id: site_id.to_owned(),
        form_id: Some("contact".to_owned()),
        data,
        origin: None,
        ip: None,
        user_agent: None,
        page_url: None,
        referrer: None,
        submitted_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn should_list_sites_without_exposing_keys() {
    let usecase = ListSitesUseCase {
        sites: MockSiteRepo::new(vec![
            test_site("zenith", "key-z", vec![]),
            test_site("acme", "key-a", vec!["https://acme.example"]),
        ]),
    };

    let sites = usecase.execute().await.unwrap();

    // Stable order by site id, and no key field on the summary type.
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].site_id, "acme");
    assert_eq!(sites[1].site_id, "zenith");
    assert_eq!(sites[0].allowed_origins, vec!["https://acme.example"]);

    let serialized = serde_json::to_value(&sites).unwrap();
    for entry in serialized.as_array().unwrap() {
        assert!(entry.get("site_key").is_none());
        assert!(entry.get("site_name").is_some());
    }
}

#[tokio::test]
async fn should_list_recent_submissions_newest_first() {
    let repo = MockSubmissionRepo::empty();
    for (site, age) in [("acme", 30), ("zenith", 10), ("acme", 20)] {
        repo.create(&submission(site, age)).await.unwrap();
    }
    let usecase = ListSubmissionsUseCase { submissions: repo };

    let rows = usecase.execute(None, None).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].site_id, "zenith");
    assert!(rows[0].submitted_at > rows[1].submitted_at);
    assert!(rows[1].submitted_at > rows[2].submitted_at);
}

#[tokio::test]
async fn should_filter_submissions_by_site() {
    let repo = MockSubmissionRepo::empty();
    for (site, age) in [("acme", 30), ("zenith", 10), ("acme", 20)] {
        repo.create(&submission(site, age)).await.unwrap();
    }
    let usecase = ListSubmissionsUseCase { submissions: repo };

    let rows = usecase.execute(None, Some("acme")).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.site_id == "acme"));
}

#[tokio::test]
async fn should_clamp_limit_before_querying() {
    let repo = MockSubmissionRepo::empty();
    let usecase = ListSubmissionsUseCase { submissions: repo };

    usecase.execute(Some("9999"), None).await.unwrap();
    assert_eq!(usecase.submissions.last_query(), Some((200, None)));

    usecase.execute(Some("abc"), None).await.unwrap();
    assert_eq!(usecase.submissions.last_query(), Some((50, None)));

    usecase.execute(Some("25"), Some("acme")).await.unwrap();
    assert_eq!(
        usecase.submissions.last_query(),
        Some((25, Some("acme".to_owned())))
    );
}

#[tokio::test]
async fn should_ignore_blank_site_filter() {
    let repo = MockSubmissionRepo::empty();
    let usecase = ListSubmissionsUseCase { submissions: repo };

    usecase.execute(None, Some("   ")).await.unwrap();
    assert_eq!(usecase.submissions.last_query(), Some((50, None)));

    usecase.execute(None, Some("  acme  ")).await.unwrap();
    assert_eq!(
        usecase.submissions.last_query(),
        Some((50, Some("acme".to_owned())))
    );
}

#[tokio::test]
async fn should_truncate_results_to_limit() {
    let repo = MockSubmissionRepo::empty();
    for age in 0..5 {
        repo.create(&submission("acme", age)).await.unwrap();
    }
    let usecase = ListSubmissionsUseCase { submissions: repo };

    let rows = usecase.execute(Some("2"), None).await.unwrap();
    assert_eq!(rows.len(), 2);
    // The newest two survive the cut.
    assert!(rows[0].submitted_at > rows[1].submitted_at);
}
