//! CallFire v2 endpoints.
//!
//! Each method maps its arguments onto a path, query and body and hands the
//! resulting spec to the `Transport`. Responses are returned undecoded:
//! call `.json()` for API objects, `.bytes()` for media downloads.

use std::io::Read;

use serde_json::Value;

use crate::error::Result;
use crate::multipart::MultipartRequest;
use crate::query::Query;
use crate::request::JsonRequest;
use crate::response::Response;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct CallFireClient {
    transport: Transport,
}

impl CallFireClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // --- calls ---

    /// `GET /calls`: calls sent or received by the account.
    pub fn find_calls(&self, query: Query) -> Result<Response> {
        self.transport.get(&mut JsonRequest::new("/calls").with_query(query))
    }

    /// `POST /calls`: send calls to an array of `CallRecipient` objects.
    pub fn send_calls(&self, query: Query, recipients: Value) -> Result<Response> {
        self.transport
            .post(&mut JsonRequest::new("/calls").with_query(query).with_body(recipients))
    }

    pub fn get_call(&self, id: u64, query: Query) -> Result<Response> {
        self.transport
            .get(&mut JsonRequest::new(format!("/calls/{id}")).with_query(query))
    }

    /// MP3 audio of a call recording. The body is binary.
    pub fn get_call_recording_mp3(&self, id: u64) -> Result<Response> {
        self.transport
            .get(&mut JsonRequest::new(format!("/calls/recordings/{id}.mp3")))
    }

    // --- contacts ---

    pub fn find_contacts(&self, query: Query) -> Result<Response> {
        self.transport.get(&mut JsonRequest::new("/contacts").with_query(query))
    }

    /// `POST /contacts` with an array of contact objects.
    pub fn create_contacts(&self, contacts: Value) -> Result<Response> {
        self.transport
            .post(&mut JsonRequest::new("/contacts").with_body(contacts))
    }

    pub fn get_contact(&self, id: u64, query: Query) -> Result<Response> {
        self.transport
            .get(&mut JsonRequest::new(format!("/contacts/{id}")).with_query(query))
    }

    pub fn update_contact(&self, id: u64, contact: Value) -> Result<Response> {
        self.transport
            .put(&mut JsonRequest::new(format!("/contacts/{id}")).with_body(contact))
    }

    pub fn delete_contact(&self, id: u64) -> Result<Response> {
        self.transport
            .delete(&mut JsonRequest::new(format!("/contacts/{id}")))
    }

    // --- account ---

    pub fn get_account(&self) -> Result<Response> {
        self.transport.get(&mut JsonRequest::new("/me/account"))
    }

    // --- uploads ---

    /// Upload an audio file as a campaign sound. `query` carries `name`.
    pub fn post_file_campaign_sound(&self, query: Query, file: impl Read + Send + 'static) -> Result<Response> {
        self.transport
            .post(&mut MultipartRequest::new("/campaigns/sounds/files", file).with_query(query))
    }

    pub fn create_media(&self, file: impl Read + Send + 'static) -> Result<Response> {
        self.transport.post(&mut MultipartRequest::new("/media", file))
    }

    /// Raw bytes of a stored media file.
    pub fn get_media_data_binary(&self, id: u64) -> Result<Response> {
        self.transport
            .get(&mut JsonRequest::new(format!("/media/{id}/file")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::fake::{FakeConnector, Reply};
    use crate::http::HttpMethod;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;

    fn client(connector: &Arc<FakeConnector>) -> CallFireClient {
        CallFireClient::new(
            Transport::builder("username", "password")
                .base_url("https://api.callfire.com/v2")
                .connector(connector.clone())
                .build(),
        )
    }

    #[test]
    fn find_calls_maps_query() {
        let connector = Arc::new(FakeConnector::ok(r#"{"items": []}"#));
        client(&connector)
            .find_calls(Query::new().with("limit", 5).with("inbound", false))
            .unwrap();

        let (sent, _) = connector.last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url, "https://api.callfire.com/v2/calls?limit=5&inbound=false");
    }

    #[test]
    fn send_calls_posts_recipients() {
        let connector = Arc::new(FakeConnector::ok("{}"));
        let recipients = json!([{"phoneNumber": "12135551100", "liveMessage": "Hello"}]);
        client(&connector)
            .send_calls(Query::new().with("defaultVoice", "MALE1"), recipients.clone())
            .unwrap();

        let (sent, _) = connector.last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, "https://api.callfire.com/v2/calls?defaultVoice=MALE1");
        let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, recipients);
    }

    #[test]
    fn id_paths_are_formatted() {
        let connector = Arc::new(FakeConnector::ok("{}"));
        let c = client(&connector);

        c.get_call(7, Query::new()).unwrap();
        assert_eq!(connector.last().0.url, "https://api.callfire.com/v2/calls/7");

        c.get_call_recording_mp3(9).unwrap();
        assert_eq!(connector.last().0.url, "https://api.callfire.com/v2/calls/recordings/9.mp3");

        c.get_media_data_binary(11).unwrap();
        assert_eq!(connector.last().0.url, "https://api.callfire.com/v2/media/11/file");
    }

    #[test]
    fn contact_crud_uses_matching_verbs() {
        let connector = Arc::new(FakeConnector::ok("{}"));
        let c = client(&connector);

        c.create_contacts(json!([{"firstName": "Ada"}])).unwrap();
        assert_eq!(connector.last().0.method, HttpMethod::Post);

        c.get_contact(3, Query::new().with("fields", "id")).unwrap();
        let (sent, _) = connector.last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url, "https://api.callfire.com/v2/contacts/3?fields=id");

        c.update_contact(3, json!({"lastName": "Lovelace"})).unwrap();
        assert_eq!(connector.last().0.method, HttpMethod::Put);

        c.delete_contact(3).unwrap();
        let (sent, _) = connector.last();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert!(sent.body.is_none());
    }

    #[test]
    fn account_has_no_query_or_body() {
        let connector = Arc::new(FakeConnector::ok(r#"{"email": "ops@example.com"}"#));
        let account: Value = client(&connector).get_account().unwrap().json().unwrap();

        assert_eq!(account["email"], "ops@example.com");
        let (sent, _) = connector.last();
        assert_eq!(sent.url, "https://api.callfire.com/v2/me/account");
        assert!(sent.body.is_none());
    }

    #[test]
    fn sound_upload_is_multipart() {
        let connector = Arc::new(FakeConnector::new(Reply::Echo));
        let response = client(&connector)
            .post_file_campaign_sound(Query::new().with("name", "greeting"), Cursor::new(b"abc".to_vec()))
            .unwrap();

        let (sent, _) = connector.last();
        assert_eq!(sent.url, "https://api.callfire.com/v2/campaigns/sounds/files?name=greeting");
        assert_eq!(sent.header("Content-Type"), Some("multipart/form-data; boundary=boundary"));
        assert_eq!(
            sent.header("Content-Length").unwrap(),
            response.bytes().len().to_string()
        );
    }

    #[test]
    fn media_upload_is_multipart() {
        let connector = Arc::new(FakeConnector::new(Reply::Echo));
        client(&connector).create_media(Cursor::new(Vec::<u8>::new())).unwrap();

        let (sent, _) = connector.last();
        assert_eq!(sent.url, "https://api.callfire.com/v2/media");
        assert!(sent.body.is_some());
    }
}
