use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::{Read, Write};

/// Decoding of an object's content, once the header has been stripped
pub trait Unpackable {
    fn deserialize(content: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object {
    fn object_type(&self) -> ObjectType;

    /// Object content without the `<type> <size>\0` header
    fn content(&self) -> Bytes;

    fn display(&self) -> String;

    /// Header followed by content, the bytes that get hashed
    fn encode(&self) -> Bytes {
        let content = self.content();
        let header = format!("{} {}\0", self.object_type().as_str(), content.len());

        let mut object_bytes = Vec::with_capacity(header.len() + content.len());
        object_bytes.extend_from_slice(header.as_bytes());
        object_bytes.extend_from_slice(&content);

        Bytes::from(object_bytes)
    }

    fn object_id(&self) -> ObjectId {
        ObjectId::hash_bytes(&self.encode())
    }

    /// Compressed on-disk form of the object
    fn serialize(&self) -> Result<Bytes> {
        compress(&self.encode())
    }
}

/// Any stored object, as read back from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    /// Decompress and decode an on-disk object
    ///
    /// Fails with [`Error::CorruptObject`] if the data does not decompress, the
    /// header is malformed, or the declared size does not match the content.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let raw = decompress(data)?;

        let header_end = raw
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| Error::corrupt_object("missing header terminator"))?;
        let header = std::str::from_utf8(&raw[..header_end])
            .map_err(|_| Error::corrupt_object("header is not valid UTF-8"))?;
        let (object_type, size) = header
            .split_once(' ')
            .ok_or_else(|| Error::corrupt_object(format!("malformed header '{header}'")))?;

        let object_type = ObjectType::try_from(object_type)?;
        let size = parse_size(size)?;

        let content = raw.slice(header_end + 1..);
        if content.len() != size {
            return Err(Error::corrupt_object(format!(
                "{object_type} declares {size} bytes but holds {}",
                content.len()
            )));
        }

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(content)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(content)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(content)?))),
        }
    }

    fn inner(&self) -> &dyn Object {
        match self {
            ObjectBox::Blob(blob) => &**blob,
            ObjectBox::Tree(tree) => &**tree,
            ObjectBox::Commit(commit) => &**commit,
        }
    }
}

impl Object for ObjectBox {
    fn object_type(&self) -> ObjectType {
        self.inner().object_type()
    }

    fn content(&self) -> Bytes {
        self.inner().content()
    }

    fn display(&self) -> String {
        self.inner().display()
    }
}

pub(crate) fn compress(data: &[u8]) -> Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;

    Ok(encoder.finish()?.into())
}

pub(crate) fn decompress(data: &[u8]) -> Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut decompressed_content = Vec::new();
    decoder
        .read_to_end(&mut decompressed_content)
        .map_err(|e| Error::corrupt_object(format!("unable to decompress object: {e}")))?;

    Ok(decompressed_content.into())
}

/// Header size: plain decimal digits, without sign or leading zeros
fn parse_size(size: &str) -> Result<usize> {
    let canonical = !size.is_empty()
        && size.bytes().all(|byte| byte.is_ascii_digit())
        && (size == "0" || !size.starts_with('0'));
    if !canonical {
        return Err(Error::corrupt_object(format!("invalid object size '{size}'")));
    }

    size.parse::<usize>()
        .map_err(|_| Error::corrupt_object(format!("invalid object size '{size}'")))
}
