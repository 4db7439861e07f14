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

use super::schema;
use super::{
    Access, CollaborationRole, EntityLike, ItemLike, Model, PagedCollection, SyncState, UploadEmailAccess, User,
};
use crate::model::Object;
use chrono::{DateTime, FixedOffset};

model! {
    /// A file.
    File => schema::FILE
}

impl EntityLike for File {}
impl ItemLike for File {}

impl File {
    /// The SHA-1 of the file contents.
    pub fn sha1(&self) -> Option<&str> {
        self.0.get_str("sha1")
    }

    pub fn version_number(&self) -> Option<&str> {
        self.0.get_str("version_number")
    }

    pub fn extension(&self) -> Option<&str> {
        self.0.get_str("extension")
    }

    pub fn is_package(&self) -> Option<bool> {
        self.0.get_bool("is_package")
    }

    /// The current version of the file.
    pub fn file_version(&self) -> Option<FileVersion> {
        self.0.get_model("file_version")
    }
}

model! {
    /// A folder.
    Folder => schema::FOLDER
}

impl EntityLike for Folder {}
impl ItemLike for Folder {}

impl Folder {
    pub fn folder_upload_email(&self) -> Option<UploadEmail> {
        self.0.get_model("folder_upload_email")
    }

    pub fn has_collaborations(&self) -> Option<bool> {
        self.0.get_bool("has_collaborations")
    }

    pub fn sync_state(&self) -> Option<SyncState> {
        self.0.get_str("sync_state").and_then(SyncState::from_wire)
    }

    pub fn can_non_owners_invite(&self) -> Option<bool> {
        self.0.get_bool("can_non_owners_invite")
    }

    /// The first page of items in this folder, if it was requested.
    pub fn item_collection(&self) -> Option<PagedCollection<Object>> {
        self.0
            .get_object("item_collection")
            .map(PagedCollection::from_object)
    }

    pub fn is_externally_owned(&self) -> Option<bool> {
        self.0.get_bool("is_externally_owned")
    }

    pub fn allowed_invitee_roles(&self) -> Vec<CollaborationRole> {
        self.0
            .get_strings("allowed_invitee_roles")
            .iter()
            .filter_map(|r| CollaborationRole::from_wire(r))
            .collect()
    }
}

model! {
    /// A bookmark, also known as a web link.
    Bookmark => schema::BOOKMARK
}

impl EntityLike for Bookmark {}
impl ItemLike for Bookmark {}

impl Bookmark {
    pub fn url(&self) -> Option<&str> {
        self.0.get_str("url")
    }
}

model! {
    /// A version of a file.
    FileVersion => schema::FILE_VERSION
}

impl EntityLike for FileVersion {}

impl FileVersion {
    pub fn name(&self) -> Option<&str> {
        self.0.get_str("name")
    }

    pub fn sha1(&self) -> Option<&str> {
        self.0.get_str("sha1")
    }

    pub fn size(&self) -> Option<i64> {
        self.0.get_long("size")
    }

    pub fn deleted_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("deleted_at")
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("created_at")
    }

    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("modified_at")
    }

    pub fn modified_by(&self) -> Option<User> {
        self.0.get_model("modified_by")
    }
}

model! {
    /// The shared link of an item.
    SharedLink => schema::SHARED_LINK
}

impl SharedLink {
    /// Creates the settings for a new shared link.
    pub fn new(access: Access) -> Self {
        Self::default().set("access", access)
    }

    /// Changes the access level.
    pub fn with_access(self, access: Access) -> Self {
        self.set("access", access)
    }

    /// Sets when the link stops working.
    pub fn with_unshared_at(self, v: DateTime<FixedOffset>) -> Self {
        self.set("unshared_at", v)
    }

    /// Protects the link with a password.
    pub fn with_password<T: Into<String>>(self, v: T) -> Self {
        self.set("password", v.into())
    }

    /// Sets the download and preview permissions.
    pub fn with_permissions(self, can_download: bool, can_preview: bool) -> Self {
        let names = [("can_download", can_download), ("can_preview", can_preview)]
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| super::Value::Enum(name.to_string()))
            .collect::<Vec<_>>();
        self.set("permissions", super::Value::Array(names))
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get_str("url")
    }

    pub fn download_url(&self) -> Option<&str> {
        self.0.get_str("download_url")
    }

    pub fn vanity_url(&self) -> Option<&str> {
        self.0.get_str("vanity_url")
    }

    pub fn is_password_enabled(&self) -> Option<bool> {
        self.0.get_bool("is_password_enabled")
    }

    pub fn unshared_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("unshared_at")
    }

    pub fn download_count(&self) -> Option<i64> {
        self.0.get_long("download_count")
    }

    pub fn preview_count(&self) -> Option<i64> {
        self.0.get_long("preview_count")
    }

    pub fn access(&self) -> Option<Access> {
        self.0.get_str("access").and_then(Access::from_wire)
    }

    pub fn effective_access(&self) -> Option<Access> {
        self.0.get_str("effective_access").and_then(Access::from_wire)
    }

    pub fn can_download(&self) -> bool {
        self.0.get_strings("permissions").iter().any(|p| p == "can_download")
    }

    pub fn can_preview(&self) -> bool {
        self.0.get_strings("permissions").iter().any(|p| p == "can_preview")
    }
}

model! {
    /// The email address used to upload files to a folder.
    UploadEmail => schema::UPLOAD_EMAIL
}

impl UploadEmail {
    pub fn new(access: UploadEmailAccess) -> Self {
        Self::default().set("access", access)
    }

    pub fn access(&self) -> Option<UploadEmailAccess> {
        self.0.get_str("access").and_then(UploadEmailAccess::from_wire)
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get_str("email")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::as_map;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn file_json() -> serde_json::Value {
        json!({
            "type": "file",
            "id": "5000948880",
            "file_version": {
                "type": "file_version",
                "id": "26261748416",
                "sha1": "134b65991ed521fcfe4724b7d814ab8ded5185dc"
            },
            "sequence_id": "3",
            "etag": "3",
            "sha1": "134b65991ed521fcfe4724b7d814ab8ded5185dc",
            "name": "tigers.jpeg",
            "description": "a picture of tigers",
            "size": 629644,
            "created_at": "2012-12-12T10:55:30-08:00",
            "modified_at": "2012-12-12T11:04:26-08:00",
            "trashed_at": null,
            "created_by": {
                "type": "user",
                "id": "17738362",
                "name": "sean rose",
                "login": "sean@box.com"
            },
            "shared_link": {
                "url": "https://www.box.com/s/rh935iit6ewrmw0unyul",
                "download_url": "https://www.box.com/shared/static/rh935iit6ewrmw0unyul.jpeg",
                "vanity_url": null,
                "is_password_enabled": false,
                "unshared_at": null,
                "download_count": 0,
                "preview_count": 0,
                "access": "open",
                "permissions": {"can_download": true, "can_preview": true}
            },
            "parent": {"type": "folder", "id": "11446498", "sequence_id": "1", "etag": "1", "name": "Pictures"},
            "item_status": "active",
            "extension": "jpeg",
            "is_package": false,
            "version_number": "1"
        })
    }

    #[test]
    fn file() {
        let file = File::from_json(&as_map(file_json()));
        assert_eq!(file.sha1(), Some("134b65991ed521fcfe4724b7d814ab8ded5185dc"));
        assert_eq!(file.extension(), Some("jpeg"));
        assert_eq!(file.is_package(), Some(false));
        assert_eq!(file.version_number(), Some("1"));
        let version = file.file_version().expect("file version is present");
        assert_eq!(version.id(), Some("26261748416"));
        let link = file.shared_link().expect("shared link is present");
        assert_eq!(link.access(), Some(Access::Open));
        assert!(link.can_download());
        assert_eq!(link.vanity_url(), None);
        assert_eq!(link.download_count(), Some(0));
        assert_eq!(file.trashed_at(), None);
    }

    #[test]
    fn file_round_trip() {
        let file = File::from_json(&as_map(file_json()));
        assert_eq!(file.to_json(), file_json());
        let again = File::from_json(&as_map(file.to_json()));
        assert_eq!(again, file);
    }

    #[test]
    fn folder_round_trip() {
        let json = json!({
            "type": "folder",
            "id": "11446498",
            "name": "Pictures",
            "folder_upload_email": {"access": "open", "email": "upload.Picture.k13sdz1@u.box.com"},
            "has_collaborations": false,
            "sync_state": "partially_synced",
            "can_non_owners_invite": true,
            "is_externally_owned": false,
            "allowed_invitee_roles": ["editor", "viewer uploader"],
            "item_collection": {
                "total_count": 2,
                "offset": 0,
                "limit": 100,
                "entries": [
                    {"type": "file", "id": "5000948880", "name": "tigers.jpeg"},
                    {"type": "web_link", "id": "6742981", "url": "https://www.box.com"}
                ],
                "order": [{"by": "type", "direction": "ASC"}]
            }
        });
        let folder = Folder::from_json(&as_map(json.clone()));
        assert_eq!(folder.sync_state(), Some(SyncState::PartiallySynced));
        assert_eq!(
            folder.allowed_invitee_roles(),
            vec![CollaborationRole::Editor, CollaborationRole::ViewerUploader]
        );
        let email = folder.folder_upload_email().expect("upload email is present");
        assert_eq!(email.access(), Some(UploadEmailAccess::Open));
        let items = folder.item_collection().expect("item collection is present");
        assert_eq!(items.len(), 2);
        assert!(matches!(items.entries()[0], Object::File(_)));
        assert!(matches!(items.entries()[1], Object::Bookmark(_)));
        assert_eq!(folder.to_json(), json);
        assert_eq!(Folder::from_json(&as_map(folder.to_json())), folder);
    }

    #[test]
    fn bookmark_round_trip() {
        let json = json!({
            "type": "web_link",
            "id": "6742981",
            "name": "Box Website",
            "url": "https://www.box.com",
            "created_at": "2015-05-07T14:31:16-07:00"
        });
        let bookmark = Bookmark::from_json(&as_map(json.clone()));
        assert_eq!(bookmark.url(), Some("https://www.box.com"));
        assert_eq!(bookmark.to_json(), json);
        assert_eq!(Bookmark::from_json(&as_map(bookmark.to_json())), bookmark);
    }

    #[test]
    fn file_version_round_trip() {
        let json = json!({
            "type": "file_version",
            "id": "672259576",
            "sha1": "359c6c1ed98081b9a69eb3513b9deced59c957f9",
            "name": "Dragons.js",
            "size": 92556,
            "created_at": "2012-08-20T10:20:30-07:00",
            "modified_at": "2012-11-28T13:14:58-08:00",
            "modified_by": {"type": "user", "id": "183732129", "name": "sean rose", "login": "sean+apitest@box.com"},
            "deleted_at": null
        });
        let version = FileVersion::from_json(&as_map(json.clone()));
        assert_eq!(version.size(), Some(92556));
        assert_eq!(version.name(), Some("Dragons.js"));
        assert!(version.modified_by().is_some());
        assert_eq!(version.to_json(), json);
        assert_eq!(FileVersion::from_json(&as_map(version.to_json())), version);
    }

    #[test]
    fn shared_link_settings() {
        let link = SharedLink::new(Access::Company)
            .with_password("secret")
            .with_permissions(true, false);
        assert_eq!(
            link.to_json(),
            json!({
                "access": "company",
                "password": "secret",
                "permissions": {"can_download": true}
            })
        );
        assert!(link.can_download());
        assert!(!link.can_preview());
    }
}
