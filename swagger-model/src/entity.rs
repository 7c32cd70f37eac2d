//! Entity readers and writers keyed by media type.
//!
//! This module is the content negotiation collaborator of the model builder:
//! a process-wide [`EntityAccessorRegistry`] maps media type strings to an
//! [`EntityReader`] / [`EntityWriter`] pair. JSON and XML accessors are
//! registered by default.
//!
//! Accessors are stored as trait objects, so they exchange type-erased serde
//! values: a reader hands a deserializer over the body to the caller, a writer
//! serializes the caller's value directly. Field order and field types are
//! those of the caller's type.
//!
//! Lookups try an exact match first and then fall back to the first registered
//! media type (in ascending order) contained in the requested string, so
//! `application/json; charset=utf-8` resolves to the JSON accessors.
//!
//! # Example
//! ```rust
//! use swagger_model::entity::{self, Response, MIME_JSON};
//! use serde_json::json;
//!
//! let mut response = Response::new();
//! entity::write_entity(MIME_JSON, &mut response, &json!({ "id": 7 })).unwrap();
//! assert_eq!(response.content_type(), Some(MIME_JSON));
//! assert_eq!(response.body(), b"{\"id\":7}\n");
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, trace};

use crate::error::{EntityError, EntityResult};

/// Media type of JSON entities.
pub const MIME_JSON: &str = "application/json";

/// Media type of XML entities.
pub const MIME_XML: &str = "application/xml";

/// Declaration written in front of pretty-printed XML.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Root element of XML entities unless configured otherwise.
pub const DEFAULT_XML_ROOT: &str = "entity";

const PRETTY_PREFIX: &[u8] = b" ";
const PRETTY_INDENT: &[u8] = b" ";

/// Receives the deserializer a reader builds over a body.
pub type Visit<'v> = dyn for<'a, 'de> FnMut(
        &'a mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<(), erased_serde::Error>
    + 'v;

/// Decodes an entity from a request body.
pub trait EntityReader: Send + Sync {
    /// Build a deserializer over `body` and pass it to `visit` once.
    fn read(&self, body: &[u8], visit: &mut Visit<'_>) -> EntityResult<()>;
}

/// Encodes an entity onto a response.
///
/// Writing `None` writes nothing and leaves the response untouched.
pub trait EntityWriter: Send + Sync {
    fn write(
        &self,
        response: &mut Response,
        value: Option<&dyn erased_serde::Serialize>,
    ) -> EntityResult<()>;
}

/// Outgoing response an [`EntityWriter`] writes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    content_type: Option<String>,
    pretty_print: bool,
    body: Vec<u8>,
}

impl Response {
    /// Create an empty response with compact output.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    /// Content type set by the last writer, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = Some(content_type.into());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl Write for Response {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.body.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// JSON
// =============================================================================

/// JSON reader and writer.
#[derive(Debug, Clone)]
pub struct JsonEntityAccess {
    content_type: String,
}

impl JsonEntityAccess {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }
}

impl Default for JsonEntityAccess {
    fn default() -> Self {
        Self::new(MIME_JSON)
    }
}

impl EntityReader for JsonEntityAccess {
    fn read(&self, body: &[u8], visit: &mut Visit<'_>) -> EntityResult<()> {
        let mut deserializer = serde_json::Deserializer::from_slice(body);
        {
            let mut erased = <dyn erased_serde::Deserializer>::erase(&mut deserializer);
            visit(&mut erased).map_err(serde_json::Error::custom)?;
        }
        deserializer.end()?;
        Ok(())
    }
}

impl EntityWriter for JsonEntityAccess {
    fn write(
        &self,
        response: &mut Response,
        value: Option<&dyn erased_serde::Serialize>,
    ) -> EntityResult<()> {
        let Some(value) = value else {
            return Ok(());
        };

        if response.pretty_print() {
            let output = to_pretty_json(value)?;
            response.set_content_type(&self.content_type);
            response.write_all(&output)?;
            return Ok(());
        }

        response.set_content_type(&self.content_type);
        serde_json::to_writer(&mut *response, value)?;
        response.write_all(b"\n")?;
        Ok(())
    }
}

/// Pretty JSON indented by one space, with every line after the first
/// prefixed by one more space.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut output = Vec::new();
    let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
    value.serialize(&mut serializer)?;

    let mut prefixed = Vec::with_capacity(output.len());
    for byte in output {
        prefixed.push(byte);
        if byte == b'\n' {
            prefixed.extend_from_slice(PRETTY_PREFIX);
        }
    }
    Ok(prefixed)
}

// =============================================================================
// XML
// =============================================================================

/// XML reader and writer.
///
/// Entities are written under a single root element. Reads ignore the root
/// element name and decode its children into the target type.
#[derive(Debug, Clone)]
pub struct XmlEntityAccess {
    content_type: String,
    root: String,
}

impl XmlEntityAccess {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            root: DEFAULT_XML_ROOT.to_string(),
        }
    }

    /// Set the root element name used when writing.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }
}

impl Default for XmlEntityAccess {
    fn default() -> Self {
        Self::new(MIME_XML)
    }
}

impl EntityReader for XmlEntityAccess {
    fn read(&self, body: &[u8], visit: &mut Visit<'_>) -> EntityResult<()> {
        let mut deserializer = quick_xml::de::Deserializer::from_reader(body);
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut deserializer);
        visit(&mut erased).map_err(quick_xml::DeError::custom)?;
        Ok(())
    }
}

impl EntityWriter for XmlEntityAccess {
    fn write(
        &self,
        response: &mut Response,
        value: Option<&dyn erased_serde::Serialize>,
    ) -> EntityResult<()> {
        let Some(value) = value else {
            return Ok(());
        };

        if response.pretty_print() {
            let mut output = String::new();
            let mut serializer =
                quick_xml::se::Serializer::with_root(&mut output, Some(self.root.as_str()))?;
            serializer.indent(' ', 1);
            value.serialize(serializer)?;

            response.set_content_type(&self.content_type);
            response.write_all(XML_HEADER.as_bytes())?;
            response.write_all(output.as_bytes())?;
            return Ok(());
        }

        let output = quick_xml::se::to_string_with_root(&self.root, value)?;
        response.set_content_type(&self.content_type);
        response.write_all(output.as_bytes())?;
        Ok(())
    }
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Default)]
struct Accessors {
    readers: BTreeMap<String, Arc<dyn EntityReader>>,
    writers: BTreeMap<String, Arc<dyn EntityWriter>>,
}

/// Thread-safe map from media type to reader and writer.
#[derive(Default)]
pub struct EntityAccessorRegistry {
    accessors: RwLock<Accessors>,
}

impl EntityAccessorRegistry {
    /// Create a registry with no accessors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the JSON and XML accessors registered.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_entity_accessors(
            MIME_JSON,
            JsonEntityAccess::default(),
            JsonEntityAccess::default(),
        );
        registry.register_entity_accessors(
            MIME_XML,
            XmlEntityAccess::default(),
            XmlEntityAccess::default(),
        );
        registry
    }

    /// Register the reader and writer for `mime`, replacing any previous pair.
    pub fn register_entity_accessors<R, W>(&self, mime: impl Into<String>, reader: R, writer: W)
    where
        R: EntityReader + 'static,
        W: EntityWriter + 'static,
    {
        let mime = mime.into();
        debug!(mime = %mime, "registering entity accessors");
        let mut accessors = self.accessors.write();
        accessors.readers.insert(mime.clone(), Arc::new(reader));
        accessors.writers.insert(mime, Arc::new(writer));
    }

    /// Reader for `mime`, by exact match or containment.
    pub fn reader_at(&self, mime: &str) -> Option<Arc<dyn EntityReader>> {
        lookup(&self.accessors.read().readers, mime)
    }

    /// Writer for `mime`, by exact match or containment.
    pub fn writer_at(&self, mime: &str) -> Option<Arc<dyn EntityWriter>> {
        lookup(&self.accessors.read().writers, mime)
    }

    /// Registered media types in ascending order.
    pub fn media_types(&self) -> Vec<String> {
        self.accessors.read().readers.keys().cloned().collect()
    }

    /// Read a typed entity from `body`.
    pub fn read_entity<T: DeserializeOwned>(&self, mime: &str, body: &[u8]) -> EntityResult<T> {
        let reader = self
            .reader_at(mime)
            .ok_or_else(|| EntityError::unsupported(mime))?;

        let mut entity = None;
        reader.read(body, &mut |deserializer: &mut dyn erased_serde::Deserializer<'_>| {
            entity = Some(erased_serde::deserialize::<T>(deserializer)?);
            Ok(())
        })?;
        entity.ok_or_else(|| EntityError::Codec(erased_serde::Error::custom("no entity read")))
    }

    /// Write a typed entity onto `response`.
    pub fn write_entity<T: Serialize + ?Sized>(
        &self,
        mime: &str,
        response: &mut Response,
        value: &T,
    ) -> EntityResult<()> {
        let writer = self
            .writer_at(mime)
            .ok_or_else(|| EntityError::unsupported(mime))?;
        writer.write(response, Some(&value))
    }
}

fn lookup<A: ?Sized>(accessors: &BTreeMap<String, Arc<A>>, mime: &str) -> Option<Arc<A>> {
    if let Some(accessor) = accessors.get(mime) {
        return Some(Arc::clone(accessor));
    }
    accessors
        .iter()
        .find(|(registered, _)| mime.contains(registered.as_str()))
        .map(|(registered, accessor)| {
            trace!(requested = mime, registered = %registered, "media type matched by containment");
            Arc::clone(accessor)
        })
}

/// The process-wide registry, with JSON and XML registered.
pub fn entity_registry() -> &'static EntityAccessorRegistry {
    static REGISTRY: OnceLock<EntityAccessorRegistry> = OnceLock::new();
    REGISTRY.get_or_init(EntityAccessorRegistry::with_defaults)
}

/// Register accessors on the process-wide registry.
pub fn register_entity_accessors<R, W>(mime: impl Into<String>, reader: R, writer: W)
where
    R: EntityReader + 'static,
    W: EntityWriter + 'static,
{
    entity_registry().register_entity_accessors(mime, reader, writer);
}

/// Read a typed entity using the process-wide registry.
pub fn read_entity<T: DeserializeOwned>(mime: &str, body: &[u8]) -> EntityResult<T> {
    entity_registry().read_entity(mime, body)
}

/// Write a typed entity using the process-wide registry.
pub fn write_entity<T: Serialize + ?Sized>(
    mime: &str,
    response: &mut Response,
    value: &T,
) -> EntityResult<()> {
    entity_registry().write_entity(mime, response, value)
}
