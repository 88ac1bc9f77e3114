use chrono::Utc;

use tfm_forms::error::FormsServiceError;
use tfm_forms::usecase::contact::{ContactInput, ContactOutcome, ContactUseCase};

use crate::helpers::MockMailer;

const LEADS_INBOX: &str = "leads@tfm.example";

fn lead_input() -> ContactInput {
    ContactInput {
        name: "Ada Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        message: "Interested in the enterprise plan.\nPlease call back.".to_owned(),
        website: None,
        started_at: Some(Utc::now().timestamp_millis() - 45_000),
    }
}

fn usecase(mailer: MockMailer) -> ContactUseCase<MockMailer> {
    ContactUseCase {
        mailer,
        contact_to: LEADS_INBOX.to_owned(),
    }
}

#[tokio::test]
async fn should_forward_valid_lead_to_inbox() {
    let mailer = MockMailer::new();
    let sent_handle = mailer.sent_handle();

    let outcome = usecase(mailer).execute(lead_input()).await.unwrap();
    assert_eq!(outcome, ContactOutcome::Sent);

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, LEADS_INBOX);
    assert_eq!(sent[0].subject, "New contact form message from Ada Lovelace");
    assert!(sent[0].html.contains("ada@example.com"));
    assert!(sent[0].html.contains("enterprise plan"));
    assert!(sent[0].html.contains("<br>"));
}

#[tokio::test]
async fn should_escape_markup_in_forwarded_lead() {
    let mailer = MockMailer::new();
    let sent_handle = mailer.sent_handle();

    let mut input = lead_input();
    input.name = "<script>alert(1)</script>".to_owned();
    usecase(mailer).execute(input).await.unwrap();

    let sent = sent_handle.lock().unwrap();
    assert!(!sent[0].html.contains("<script>"));
    assert!(sent[0].html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn should_discard_spam_without_sending() {
    let spam_variants: Vec<ContactInput> = vec![
        ContactInput {
            website: Some("https://spam.example".to_owned()),
            ..lead_input()
        },
        ContactInput {
            started_at: None,
            ..lead_input()
        },
        ContactInput {
            started_at: Some(Utc::now().timestamp_millis() - 300),
            ..lead_input()
        },
        ContactInput {
            message: "https://a.example https://b.example https://c.example https://d.example"
                .to_owned(),
            ..lead_input()
        },
        ContactInput {
            message: "[url=https://spam.example]buy now[/url]".to_owned(),
            ..lead_input()
        },
    ];

    for input in spam_variants {
        let mailer = MockMailer::new();
        let sent_handle = mailer.sent_handle();
        let outcome = usecase(mailer).execute(input).await.unwrap();
        assert_eq!(outcome, ContactOutcome::Discarded);
        assert!(sent_handle.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn should_reject_incomplete_or_invalid_fields() {
    let cases: Vec<(ContactInput, &str)> = vec![
        (
            ContactInput {
                name: "  ".to_owned(),
                ..lead_input()
            },
            "Missing required field: name.",
        ),
        (
            ContactInput {
                email: String::new(),
                ..lead_input()
            },
            "Missing required field: email.",
        ),
        (
            ContactInput {
                message: "  ".to_owned(),
                ..lead_input()
            },
            "Missing required field: message.",
        ),
        (
            ContactInput {
                email: "not-an-address".to_owned(),
                ..lead_input()
            },
            "Invalid email address.",
        ),
        (
            ContactInput {
                name: "x".repeat(201),
                ..lead_input()
            },
            "Field too long.",
        ),
    ];

    for (input, expected) in cases {
        let err = usecase(MockMailer::new()).execute(input).await.unwrap_err();
        match err {
            FormsServiceError::BadRequest(msg) => assert_eq!(msg, expected),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn should_surface_mail_failure_for_valid_lead() {
    let err = usecase(MockMailer::failing())
        .execute(lead_input())
        .await
        .unwrap_err();
    assert!(matches!(err, FormsServiceError::Mail(_)));
}
