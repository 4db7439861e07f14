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
use super::{CollaboratorLike, EntityLike, UserRole, UserStatus};

model! {
    /// A user account.
    User => schema::USER
}

impl EntityLike for User {}
impl CollaboratorLike for User {}

impl User {
    /// The email address used to log in.
    pub fn login(&self) -> Option<&str> {
        self.0.get_str("login")
    }

    pub fn role(&self) -> Option<UserRole> {
        self.0.get_str("role").and_then(UserRole::from_wire)
    }

    pub fn language(&self) -> Option<&str> {
        self.0.get_str("language")
    }

    pub fn timezone(&self) -> Option<&str> {
        self.0.get_str("timezone")
    }

    /// The storage quota in bytes.
    pub fn space_amount(&self) -> Option<i64> {
        self.0.get_long("space_amount")
    }

    pub fn space_used(&self) -> Option<i64> {
        self.0.get_long("space_used")
    }

    pub fn max_upload_size(&self) -> Option<i64> {
        self.0.get_long("max_upload_size")
    }

    pub fn status(&self) -> Option<UserStatus> {
        self.0.get_str("status").and_then(UserStatus::from_wire)
    }

    pub fn job_title(&self) -> Option<&str> {
        self.0.get_str("job_title")
    }

    pub fn phone(&self) -> Option<&str> {
        self.0.get_str("phone")
    }

    pub fn address(&self) -> Option<&str> {
        self.0.get_str("address")
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.0.get_str("avatar_url")
    }

    /// The tracking codes, as JSON text.
    pub fn tracking_codes(&self) -> Option<&str> {
        self.0.get_str("tracking_codes")
    }

    pub fn can_see_managed_users(&self) -> Option<bool> {
        self.0.get_bool("can_see_managed_users")
    }

    pub fn is_sync_enabled(&self) -> Option<bool> {
        self.0.get_bool("is_sync_enabled")
    }

    pub fn is_external_collab_restricted(&self) -> Option<bool> {
        self.0.get_bool("is_external_collab_restricted")
    }

    pub fn is_exempt_from_device_limits(&self) -> Option<bool> {
        self.0.get_bool("is_exempt_from_device_limits")
    }

    pub fn is_exempt_from_login_verification(&self) -> Option<bool> {
        self.0.get_bool("is_exempt_from_login_verification")
    }

    pub fn enterprise(&self) -> Option<Enterprise> {
        self.0.get_model("enterprise")
    }

    pub fn hostname(&self) -> Option<&str> {
        self.0.get_str("hostname")
    }

    pub fn my_tags(&self) -> Vec<String> {
        self.0.get_strings("my_tags")
    }
}

model! {
    /// A group of users.
    Group => schema::GROUP
}

impl EntityLike for Group {}
impl CollaboratorLike for Group {}

model! {
    Enterprise => schema::ENTERPRISE
}

impl EntityLike for Enterprise {}

impl Enterprise {
    pub fn name(&self) -> Option<&str> {
        self.0.get_str("name")
    }
}
