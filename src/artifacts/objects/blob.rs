//! Blob object
//!
//! Blobs store the raw bytes of a single file, with no name or mode attached
//! (those live in the referencing tree entry).
//!
//! ## Format
//!
//! `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn new(content: impl Into<Bytes>) -> Self {
        Blob {
            content: content.into(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.content
    }
}

impl Unpackable for Blob {
    fn deserialize(content: Bytes) -> Result<Self> {
        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn content(&self) -> Bytes {
        self.content.clone()
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}
