use std::sync::Mutex;

use axum::Router;
use futures::future::BoxFuture;
use llm_common::anthropic::{ContentBlock, MessagesRequest, MessagesResponse};
use llm_common::{LlmClientError, TextGenerator};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use reqwest::StatusCode;

pub async fn spawn_host(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Builds a small but real PDF with one line of Courier text per page.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

enum FakeReply {
    Text(String),
    Empty,
    Unauthorized,
}

/// Stand-in for the Anthropic client that records every request it receives.
pub struct FakeGenerator {
    reply: FakeReply,
    pub requests: Mutex<Vec<MessagesRequest>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with(FakeReply::Text(text.to_string()))
    }

    pub fn empty() -> Self {
        Self::with(FakeReply::Empty)
    }

    pub fn unauthorized() -> Self {
        Self::with(FakeReply::Unauthorized)
    }

    fn with(reply: FakeReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl TextGenerator for FakeGenerator {
    fn create_message(
        &self,
        request: MessagesRequest,
    ) -> BoxFuture<'_, Result<MessagesResponse, LlmClientError>> {
        self.requests.lock().unwrap().push(request);
        let result = match &self.reply {
            FakeReply::Text(text) => Ok(response(vec![ContentBlock {
                kind: "text".to_string(),
                text: Some(text.clone()),
            }])),
            FakeReply::Empty => Ok(response(Vec::new())),
            FakeReply::Unauthorized => Err(LlmClientError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                kind: "authentication_error".to_string(),
                message: "invalid x-api-key".to_string(),
            }),
        };
        Box::pin(async move { result })
    }
}

fn response(content: Vec<ContentBlock>) -> MessagesResponse {
    MessagesResponse {
        id: Some("msg_test".to_string()),
        model: None,
        role: Some("assistant".to_string()),
        content,
        stop_reason: Some("end_turn".to_string()),
        usage: None,
    }
}
