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

//! Enumerated values with a fixed wire form.

use super::Value;

macro_rules! wire_enum {
    ($(#[$attr:meta])* $name:ident { $($(#[$vattr:meta])* $variant:ident => $wire:literal),* $(,)? }) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vattr])* $variant),*
        }

        impl $name {
            /// The wire form of every value.
            pub const WIRE: &'static [&'static str] = &[$($wire),*];

            /// The wire form of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),*
                }
            }

            /// Parses the wire form.
            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Self {
                Value::Enum(v.as_str().to_string())
            }
        }
    };
}

wire_enum! {
    /// Who can use a shared link.
    Access {
        Open => "open",
        Company => "company",
        Collaborators => "collaborators",
    }
}

wire_enum! {
    /// The permission level of a collaborator.
    CollaborationRole {
        Editor => "editor",
        Viewer => "viewer",
        Previewer => "previewer",
        Uploader => "uploader",
        PreviewerUploader => "previewer uploader",
        ViewerUploader => "viewer uploader",
        CoOwner => "co-owner",
        Owner => "owner",
    }
}

wire_enum! {
    CollaborationStatus {
        Accepted => "accepted",
        Pending => "pending",
        Rejected => "rejected",
    }
}

wire_enum! {
    ItemStatus {
        Active => "active",
        Trashed => "trashed",
        Deleted => "deleted",
    }
}

wire_enum! {
    /// Whether a folder is synced to desktop clients.
    SyncState {
        Synced => "synced",
        NotSynced => "not_synced",
        PartiallySynced => "partially_synced",
    }
}

wire_enum! {
    UserRole {
        Admin => "admin",
        CoAdmin => "coadmin",
        User => "user",
    }
}

wire_enum! {
    UserStatus {
        Active => "active",
        Inactive => "inactive",
        CannotDeleteEdit => "cannot_delete_edit",
        CannotDeleteEditUpload => "cannot_delete_edit_upload",
    }
}

wire_enum! {
    /// Who can email files into a folder.
    UploadEmailAccess {
        Open => "open",
        Collaborators => "collaborators",
    }
}

wire_enum! {
    /// The messages sent by the realtime server.
    Message {
        /// Something changed, read the event stream.
        NewChange => "new_change",
        /// Poll again.
        Reconnect => "reconnect",
    }
}

wire_enum! {
    Direction {
        Ascending => "ASC",
        Descending => "DESC",
    }
}

wire_enum! {
    /// The events returned by the user event stream.
    StreamType {
        All => "all",
        Changes => "changes",
        Sync => "sync",
    }
}

wire_enum! {
    /// The content searched by a query.
    SearchScope {
        UserContent => "user_content",
        EnterpriseContent => "enterprise_content",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Access::Open)]
    #[test_case(Access::Company)]
    #[test_case(Access::Collaborators)]
    fn access(v: Access) {
        assert_eq!(Access::from_wire(v.as_str()), Some(v));
        assert_eq!(Value::from(v), Value::Enum(v.to_string()));
    }

    #[test]
    fn roles() {
        assert_eq!(
            CollaborationRole::from_wire("previewer uploader"),
            Some(CollaborationRole::PreviewerUploader)
        );
        assert_eq!(CollaborationRole::CoOwner.as_str(), "co-owner");
        assert_eq!(CollaborationRole::WIRE.len(), 8);
        assert_eq!(CollaborationRole::from_wire("boss"), None);
    }

    #[test]
    fn direction() {
        assert_eq!(Direction::from_wire("ASC"), Some(Direction::Ascending));
        assert_eq!(Direction::Descending.to_string(), "DESC");
    }
}
