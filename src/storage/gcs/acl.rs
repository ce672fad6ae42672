//! Predefined object ACLs for the XML API
//!
//! Reference: https://cloud.google.com/storage/docs/access-control/lists#predefined-acl

use std::collections::HashMap;

/// Predefined object ACL, applied via the `x-goog-acl` request header
#[derive(Debug, PartialEq, Clone)]
pub enum ObjectAcl {
    /// Owner gets full control, nobody else has access
    Private,
    /// Owner gets full control, project team members keep their roles
    ProjectPrivate,
    /// Owner gets full control, anonymous users get read access
    PublicRead,
    /// Owner gets full control, authenticated users get read access
    AuthenticatedRead,
    /// Owner gets full control, bucket owner gets read access
    BucketOwnerRead,
    /// Object and bucket owners both get full control
    BucketOwnerFullControl,
}

impl From<ObjectAcl> for String {
    fn from(val: ObjectAcl) -> Self {
        match val {
            ObjectAcl::Private => String::from("private"),
            ObjectAcl::ProjectPrivate => String::from("project-private"),
            ObjectAcl::PublicRead => String::from("public-read"),
            ObjectAcl::AuthenticatedRead => String::from("authenticated-read"),
            ObjectAcl::BucketOwnerRead => String::from("bucket-owner-read"),
            ObjectAcl::BucketOwnerFullControl => String::from("bucket-owner-full-control"),
        }
    }
}

/// ACL headers attached to a storage request
#[derive(Debug, Clone, Default)]
pub struct AclHeader {
    headers: HashMap<String, String>,
}

impl AclHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Set the predefined ACL of the object being written
    pub fn insert_object_acl(&mut self, acl: ObjectAcl) -> &mut Self {
        self.headers.insert("x-goog-acl".to_string(), acl.into());
        self
    }
}
