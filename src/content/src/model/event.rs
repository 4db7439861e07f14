// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::collection::EventEntry;
use super::schema;
use super::{EntityLike, Message, Model, Object, User};
use chrono::{DateTime, FixedOffset};

/// The legacy adjustment applied to [RealTimeServer::retry_timeout].
const LEGACY_RETRY_TIMEOUT_OFFSET: i64 = 590;

model! {
    /// A change in a user's content.
    Event => schema::EVENT, page = schema::EVENT_PAGE
}

impl EntityLike for Event {}

impl EventEntry for Event {
    fn event_id(&self) -> Option<&str> {
        self.0.get_str("event_id")
    }
}

/// Accessors shared by user and enterprise events.
macro_rules! event_accessors {
    ($name:ident) => {
        impl $name {
            pub fn event_id(&self) -> Option<&str> {
                self.0.get_str("event_id")
            }

            pub fn event_type(&self) -> Option<&str> {
                self.0.get_str("event_type")
            }

            pub fn session_id(&self) -> Option<&str> {
                self.0.get_str("session_id")
            }

            pub fn is_package(&self) -> Option<bool> {
                self.0.get_bool("is_package")
            }

            pub fn created_by(&self) -> Option<User> {
                self.0.get_model("created_by")
            }

            /// The object the event is about.
            ///
            /// `None` if the source was absent or had an unknown type.
            pub fn source(&self) -> Option<Object> {
                self.0.get_object("source").cloned().map(Object::from)
            }

            pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
                self.0.get_date("created_at")
            }

            pub fn recorded_at(&self) -> Option<DateTime<FixedOffset>> {
                self.0.get_date("recorded_at")
            }
        }
    };
}

event_accessors!(Event);

model! {
    /// An entry of the enterprise audit log.
    EnterpriseEvent => schema::ENTERPRISE_EVENT, page = schema::ENTERPRISE_EVENT_PAGE
}

impl EntityLike for EnterpriseEvent {}

impl EventEntry for EnterpriseEvent {
    fn event_id(&self) -> Option<&str> {
        self.0.get_str("event_id")
    }
}

event_accessors!(EnterpriseEvent);

impl EnterpriseEvent {
    pub fn ip_address(&self) -> Option<&str> {
        self.0.get_str("ip_address")
    }

    pub fn accessible_by(&self) -> Option<Object> {
        self.0.get_object("accessible_by").cloned().map(Object::from)
    }

    /// The event details as JSON text.
    pub fn additional_details(&self) -> Option<&str> {
        self.0.get_str("additional_details")
    }
}

impl From<EnterpriseEvent> for Event {
    fn from(value: EnterpriseEvent) -> Self {
        Event::wrap(value.0)
    }
}

model! {
    /// A server for long-polling the event stream.
    RealTimeServer => schema::REALTIME_SERVER, page = schema::REALTIME_SERVER_PAGE
}

impl EntityLike for RealTimeServer {}

impl RealTimeServer {
    pub fn url(&self) -> Option<&str> {
        self.0.get_str("url")
    }

    /// How long the server url remains valid, in seconds.
    pub fn ttl(&self) -> Option<i64> {
        self.0.get_long("ttl")
    }

    /// How many times a connection may be retried before discovering a new server.
    pub fn max_retries(&self) -> Option<i64> {
        self.0.get_long("max_retries")
    }

    /// The long-poll timeout, in seconds.
    pub fn retry_timeout(&self) -> Option<i64> {
        self.0.get_long("retry_timeout")
    }

    /// The retry timeout with the legacy offset of 590 seconds removed.
    pub fn adjusted_retry_timeout(&self) -> Option<i64> {
        self.retry_timeout()
            .map(|t| t.saturating_sub(LEGACY_RETRY_TIMEOUT_OFFSET))
    }
}

model! {
    /// The body returned by a long-poll connection.
    SimpleMessage => schema::SIMPLE_MESSAGE
}

impl SimpleMessage {
    pub fn message(&self) -> Option<Message> {
        self.0.get_str("message").and_then(Message::from_wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::as_map;
    use crate::model::{CollaboratorLike, Entry, ItemLike};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn event() {
        let json = json!({
            "type": "event",
            "event_id": "f82c3ba03e41f7e8a7608363cc6c0390183c3f83",
            "created_by": {"type": "user", "id": "17738362", "name": "sean rose", "login": "sean@box.com"},
            "created_at": "2012-12-12T10:53:43-08:00",
            "recorded_at": "2012-12-12T10:53:48-08:00",
            "event_type": "ITEM_CREATE",
            "session_id": "70090280850c8d2a1933c1",
            "source": {
                "type": "folder",
                "id": "11446498",
                "sequence_id": "0",
                "etag": "0",
                "name": "Pictures"
            }
        });
        let event = Event::from_json(&as_map(json.clone()));
        assert_eq!(event.event_type(), Some("ITEM_CREATE"));
        assert_eq!(event.created_by().and_then(|u| u.name().map(str::to_string)), Some("sean rose".to_string()));
        let Some(Object::Folder(folder)) = event.source() else {
            panic!("expected a folder source: {event:?}");
        };
        assert_eq!(folder.name(), Some("Pictures"));
        assert_eq!(event.to_json(), json);
        assert_eq!(Event::from_json(&as_map(event.to_json())), event);
    }

    #[test]
    fn legacy_source() {
        let json = json!({
            "type": "event",
            "event_id": "1",
            "source": {"item_type": "file", "item_id": "5000948880", "item_name": "tigers.jpeg"}
        });
        let event = Event::from_json(&as_map(json));
        let Some(Object::File(file)) = event.source() else {
            panic!("expected a file source: {event:?}");
        };
        assert_eq!(file.id(), Some("5000948880"));
        assert_eq!(file.entity_type(), Some("file"));
    }

    #[test]
    fn unknown_source() {
        let json = json!({"type": "event", "event_id": "1", "source": {"type": "unknown", "id": "1"}});
        let event = Event::from_json(&as_map(json));
        assert_eq!(event.source(), None);
    }

    #[test]
    fn enterprise_event() {
        let json = json!({
            "type": "event",
            "event_id": "b9a2393a-20cf-4307-90f5-004110dec209",
            "created_by": {"type": "user", "id": "855060", "name": "Admin", "login": "admin@example.com"},
            "created_at": "2013-12-18T11:08:26-08:00",
            "event_type": "ADD_LOGIN_ACTIVITY_DEVICE",
            "ip_address": "67.169.5.177",
            "accessible_by": {"type": "group", "id": "119720", "name": "family"},
            "additional_details": {"size": 42, "shared_link_id": "abc"}
        });
        let event = EnterpriseEvent::from_json(&as_map(json.clone()));
        assert_eq!(event.ip_address(), Some("67.169.5.177"));
        assert!(matches!(event.accessible_by(), Some(Object::Group(_))));
        assert_eq!(
            event.additional_details(),
            Some(r#"{"size":42,"shared_link_id":"abc"}"#)
        );
        assert_eq!(event.to_json(), json);
        assert_eq!(EnterpriseEvent::from_json(&as_map(event.to_json())), event);

        let plain = Event::from(event);
        assert_eq!(plain.event_type(), Some("ADD_LOGIN_ACTIVITY_DEVICE"));
    }

    #[test]
    fn enterprise_event_as_entry() {
        let object = crate::model::resolve(
            schema::Resolver::Entity,
            &as_map(json!({"type": "event", "event_id": "1", "ip_address": "10.0.0.1"})),
        );
        let object = object.expect("events are known");
        assert!(Event::from_entry(object.clone()).is_some());
        assert!(EnterpriseEvent::from_entry(object).is_some());
    }

    #[test]
    fn realtime_server() {
        let json = json!({
            "type": "realtime_server",
            "url": "http://2.realtime.services.box.net/subscribe?channel=cc807c9c4869ffb1c81a&stream_type=all",
            "ttl": "10",
            "max_retries": "10",
            "retry_timeout": 610
        });
        let server = RealTimeServer::from_json(&as_map(json));
        assert_eq!(server.ttl(), Some(10));
        assert_eq!(server.max_retries(), Some(10));
        assert_eq!(server.retry_timeout(), Some(610));
        assert_eq!(server.adjusted_retry_timeout(), Some(20));
        assert!(server.url().is_some_and(|u| u.contains("channel=cc807c9c4869ffb1c81a")));
    }

    #[test]
    fn adjusted_retry_timeout_extremes() {
        let server = |timeout: i64| RealTimeServer::from_json(&as_map(json!({"retry_timeout": timeout})));
        assert_eq!(server(0).adjusted_retry_timeout(), Some(-590));
        assert_eq!(server(i64::MIN).adjusted_retry_timeout(), Some(i64::MIN));
        assert_eq!(server(i64::MAX).adjusted_retry_timeout(), Some(i64::MAX - 590));
        assert_eq!(RealTimeServer::from_json(&as_map(json!({}))).adjusted_retry_timeout(), None);
    }

    #[test]
    fn simple_message() {
        let message = SimpleMessage::from_json(&as_map(json!({"message": "new_change"})));
        assert_eq!(message.message(), Some(Message::NewChange));
        let message = SimpleMessage::from_json(&as_map(json!({"message": "reconnect"})));
        assert_eq!(message.message(), Some(Message::Reconnect));
        let message = SimpleMessage::from_json(&as_map(json!({"message": "other"})));
        assert_eq!(message.message(), None);
    }
}
