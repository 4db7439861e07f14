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

use super::{enc, reference};
use crate::client::ClientInner;
use crate::model::{Collaboration, CollaborationRole, JsonObject, PagedCollection, schema};
use crate::request::Request;
use http::Method;
use std::sync::Arc;

/// Operations on collaborations, the access granted to a user or group on a
/// folder.
#[derive(Clone, Debug)]
pub struct Collaborations {
    inner: Arc<ClientInner>,
}

impl Collaborations {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn request<T>(&self, method: Method, path: &str) -> Request<T> {
        Request::new(self.inner.clone(), method, self.inner.url(path))
    }

    pub fn info(&self, id: &str) -> Request<Collaboration> {
        self.request(Method::GET, &format!("/collaborations/{}", enc(id)))
    }

    /// Grants a user or group access to a folder.
    ///
    /// # Parameters
    /// * `folder_id` - the folder to share.
    /// * `collaborator_type` - either `user` or `group`.
    /// * `collaborator_id` - the id of the user or group.
    /// * `role` - the access level.
    pub fn add(
        &self,
        folder_id: &str,
        collaborator_type: &str,
        collaborator_id: &str,
        role: CollaborationRole,
    ) -> Request<Collaboration> {
        self.create(folder_id, reference(collaborator_type, collaborator_id), role)
    }

    /// Grants access to a folder to the user with the given login, inviting
    /// them if they do not have an account.
    pub fn add_by_login(&self, folder_id: &str, login: &str, role: CollaborationRole) -> Request<Collaboration> {
        let mut user = JsonObject::new(&schema::ENTITY);
        user.set("type", "user");
        user.set("login", login);
        self.create(folder_id, user, role)
    }

    fn create(&self, folder_id: &str, accessible_by: JsonObject, role: CollaborationRole) -> Request<Collaboration> {
        self.request::<Collaboration>(Method::POST, "/collaborations")
            .with_body_field("item", reference("folder", folder_id))
            .with_body_field("accessible_by", accessible_by)
            .with_body_field("role", role)
    }

    /// Lists the collaborations the current user has not accepted yet.
    pub fn pending(&self) -> Request<PagedCollection<Collaboration>> {
        self.request::<PagedCollection<Collaboration>>(Method::GET, "/collaborations")
            .with_query("status", "pending")
    }

    /// Changes the role or status of a collaboration.
    pub fn update(&self, id: &str) -> Request<Collaboration> {
        self.request(Method::PUT, &format!("/collaborations/{}", enc(id)))
    }

    pub fn delete(&self, id: &str) -> Request<()> {
        self.request(Method::DELETE, &format!("/collaborations/{}", enc(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::*;
    use crate::model::CollaborationStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body<T>(request: &Request<T>) -> serde_json::Value {
        let (bytes, _) = request.body().expect("the request has a body");
        serde_json::from_slice(&bytes).expect("the body is JSON")
    }

    #[test]
    fn requests() {
        let collaborations = test_client(MockTransport::new()).collaborations();
        let add = collaborations
            .add("5", "group", "77", CollaborationRole::ViewerUploader)
            .with_notify(false);
        assert_eq!(add.url(), "https://api.test/2.0/collaborations");
        assert_eq!(add.query("notify"), Some("false"));
        assert_eq!(
            body(&add),
            json!({
                "item": {"type": "folder", "id": "5"},
                "accessible_by": {"type": "group", "id": "77"},
                "role": "viewer uploader"
            })
        );
        assert_eq!(
            body(&collaborations.add_by_login("5", "sean@box.com", CollaborationRole::Editor)),
            json!({
                "item": {"type": "folder", "id": "5"},
                "accessible_by": {"type": "user", "login": "sean@box.com"},
                "role": "editor"
            })
        );
        assert_eq!(collaborations.pending().query("status"), Some("pending"));
        assert_eq!(
            body(&collaborations.update("9").with_role(CollaborationRole::Viewer).with_status(CollaborationStatus::Accepted)),
            json!({"role": "viewer", "status": "accepted"})
        );
        assert_eq!(collaborations.delete("9").method(), &Method::DELETE);
    }
}
