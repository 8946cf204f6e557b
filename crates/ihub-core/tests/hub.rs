//! Session behavior against an in-memory backend.

use ihub_core::prelude::*;
use ihub_test::MockDirectory;

fn session(backend: &MockDirectory) -> Hub {
    Hub::new(HubServices::from_backend(backend.clone()))
}

fn code(value: &str) -> ProviderCode {
    ProviderCode::new(value).unwrap()
}

fn raw(code: &str, provider_type: &str) -> RawProvider {
    RawProvider {
        provider_code: code.to_owned(),
        provider_name: Some(code.to_uppercase()),
        provider_type: Some(provider_type.to_owned()),
        connection_status: Some("working".to_owned()),
        ..RawProvider::default()
    }
}

fn postbox() -> Credentials {
    let values = FieldValues::from([
        (CredentialField::PostboxAccessKey, "AK1".to_owned()),
        (CredentialField::PostboxSecretKey, "SK1".to_owned()),
        (CredentialField::PostboxFromEmail, "a@b.com".to_owned()),
    ]);
    Credentials::from_fields(ProviderType::YandexPostbox.credential_group(), &values).unwrap()
}

#[tokio::test]
async fn create_then_list_reports_stored_config() {
    let backend = MockDirectory::new();
    let mut hub = session(&backend);

    hub.create("Postbox", &code("ek_email"), ProviderType::YandexPostbox, postbox())
        .await
        .unwrap();

    let records = &hub.directory().records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].code.as_str(), "ek_email");
    assert!(records[0].has_stored_config);
    assert!(hub.directory().has_config(&code("ek_email")));
    assert!(!hub.directory().loading);
}

#[tokio::test]
async fn create_without_credentials_has_no_stored_config() {
    let backend = MockDirectory::new();
    let mut hub = session(&backend);

    hub.create("SMS", &code("ek_sms"), ProviderType::Sms, Credentials::None)
        .await
        .unwrap();

    assert!(!hub.directory().records[0].has_stored_config);
}

#[tokio::test]
async fn unsubmittable_create_never_reaches_backend() {
    let backend = MockDirectory::new();
    let mut hub = session(&backend);

    for name in ["", "   "] {
        let error = hub
            .create(name, &code("ek_email"), ProviderType::YandexPostbox, postbox())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn add_draft_is_cleared_only_on_success() {
    let backend = MockDirectory::new();
    let mut hub = session(&backend);

    hub.open_add();
    let draft = hub.add_draft_mut();
    draft.name = "WhatsApp".to_owned();
    draft.set_code("EK WhatsApp!");
    draft.provider_type = Some(ProviderType::WhatsappBusiness);
    draft.set_field(CredentialField::WappiToken, "tok");
    draft.set_field(CredentialField::WappiProfileId, "p1");

    backend.fail_next(ErrorKind::NetworkError);
    let error = hub.submit_add_draft().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NetworkError);
    assert!(hub.dialogs().add_open);
    assert!(!hub.dialogs().saving);
    assert_eq!(hub.drafts().add.code(), "ekwhatsapp");

    hub.submit_add_draft().await.unwrap();
    assert!(!hub.dialogs().add_open);
    assert_eq!(hub.drafts().add.code(), "");
    assert_eq!(hub.directory().records.len(), 1);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_list() {
    let backend = MockDirectory::new().with_providers([raw("ek_whatsapp", "whatsapp_business")]);
    let mut hub = session(&backend);
    hub.refresh_providers().await.unwrap();

    backend.fail_next(ErrorKind::Timeout);
    let error = hub.refresh_providers().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert_eq!(hub.directory().records.len(), 1);
    assert!(!hub.directory().loading);
}

#[tokio::test]
async fn listed_statuses_stay_in_known_set() {
    let mut bogus = raw("ek_push", "fcm");
    bogus.connection_status = Some("bogus".to_owned());
    let backend = MockDirectory::new().with_providers([bogus, raw("ek_max", "max")]);
    let mut hub = session(&backend);

    hub.refresh_providers().await.unwrap();

    let statuses = hub
        .directory()
        .records
        .iter()
        .map(|record| record.connection_status)
        .collect::<Vec<_>>();
    assert_eq!(statuses, [ConnectionStatus::NotConfigured, ConnectionStatus::Working]);
}

#[tokio::test]
async fn delete_of_unknown_code_leaves_list_unchanged() {
    let backend = MockDirectory::new().with_providers([raw("ek_whatsapp", "whatsapp_business")]);
    let mut hub = session(&backend);
    hub.refresh_providers().await.unwrap();

    hub.request_delete(&code("ek_missing"));
    let error = hub.confirm_delete().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(hub.directory().records.len(), 1);
    assert_eq!(hub.dialogs().delete, Some(code("ek_missing")));
    assert!(!hub.dialogs().deleting);
}

#[tokio::test]
async fn delete_closes_views_of_the_code() {
    let backend = MockDirectory::new().with_providers([raw("ek_email", "yandex_postbox")]);
    let mut hub = session(&backend);
    hub.refresh_providers().await.unwrap();

    hub.open_config(&code("ek_email")).unwrap();
    hub.request_delete(&code("ek_email"));
    hub.confirm_delete().await.unwrap();

    assert!(hub.directory().records.is_empty());
    assert_eq!(hub.dialogs().config, None);
    assert_eq!(hub.dialogs().delete, None);
    assert_eq!(hub.drafts().config, None);
}

#[tokio::test]
async fn config_draft_survives_failure() {
    let backend = MockDirectory::new().with_providers([raw("ek_email", "yandex_postbox")]);
    let mut hub = session(&backend);
    hub.refresh_providers().await.unwrap();

    let draft = hub.open_config(&code("ek_email")).unwrap();
    assert!(draft.fields.is_empty());
    draft.set_field(CredentialField::PostboxAccessKey, "AK1");
    draft.set_field(CredentialField::PostboxSecretKey, "SK1");
    draft.set_field(CredentialField::PostboxFromEmail, "a@b.com");

    backend.fail_next(ErrorKind::Rejected);
    hub.save_config().await.unwrap_err();
    assert!(hub.drafts().config.is_some());
    assert_eq!(hub.dialogs().config, Some(code("ek_email")));

    hub.save_config().await.unwrap();
    assert!(hub.drafts().config.is_none());
    assert_eq!(hub.dialogs().config, None);
    assert!(hub.directory().has_config(&code("ek_email")));
}

#[tokio::test]
async fn update_with_foreign_group_is_rejected_locally() {
    let backend = MockDirectory::new().with_providers([raw("ek_whatsapp", "whatsapp_business")]);
    let mut hub = session(&backend);
    hub.refresh_providers().await.unwrap();

    let error = hub.update(&code("ek_whatsapp"), postbox()).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidInput);
    assert_eq!(backend.calls(), ["list"]);
}

#[tokio::test]
async fn retry_refreshes_logs_and_dashboard() {
    let backend = MockDirectory::new()
        .with_providers([raw("ek_whatsapp", "whatsapp_business")])
        .with_logs([MessageLogEntry {
            message_id: "msg_1".to_owned(),
            provider: "ek_whatsapp".to_owned(),
            status: MessageStatus::Failed,
            attempts: 1,
            max_attempts: 3,
            ..MessageLogEntry::default()
        }]);
    let mut hub = session(&backend);
    hub.refresh_providers().await.unwrap();
    hub.refresh_logs(50).await.unwrap();
    assert_eq!(hub.dashboard().delivered, 0);

    let receipt = hub.retry_message("msg_1").await.unwrap();

    assert_eq!(receipt.status, Some(MessageStatus::Delivered));
    assert_eq!(hub.dialogs().retrying, None);
    assert_eq!(hub.activity().logs[0].attempts, 2);

    let stats = hub.dashboard();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.provider_activity[0].requests, 1);
}

#[tokio::test]
async fn failed_log_refresh_keeps_entries() {
    let backend = MockDirectory::new().with_logs([MessageLogEntry::default()]);
    let mut hub = session(&backend);
    hub.refresh_logs(10).await.unwrap();

    backend.fail_next(ErrorKind::NetworkError);
    hub.refresh_logs(10).await.unwrap_err();

    assert_eq!(hub.activity().logs.len(), 1);
    assert!(!hub.activity().loading_logs);
}

#[tokio::test]
async fn details_dialog_stays_open_on_failure() {
    let backend = MockDirectory::new();
    let mut hub = session(&backend);

    let error = hub.open_log_details("msg_404").await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(hub.dialogs().log_details.as_deref(), Some("msg_404"));
    assert!(!hub.activity().loading_details);
}

#[tokio::test]
async fn test_dispatch_goes_through_known_provider() {
    let backend = MockDirectory::new().with_providers([raw("ek_sms", "sms")]);
    let mut hub = session(&backend);

    let message = TestMessage::new("ek_sms", "+79990000000", "ping", None).unwrap();
    let receipt = hub.send_test(&message).await.unwrap();
    assert_eq!(receipt.status, Some(MessageStatus::Sent));
    assert_eq!(backend.logs().len(), 1);

    let message = TestMessage::new("ek_other", "+79990000000", "ping", None).unwrap();
    let error = hub.send_test(&message).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}
