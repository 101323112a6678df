use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field-name to value mapping used for partial updates and the
/// free-form extension attributes of a product.
pub type FieldMap = Map<String, Value>;

/// Key under which the identifier is stored in a product document.
pub const ID_FIELD: &str = "id";

/// A catalogue entry. Every field is optional on input and falls back to its
/// zero value, whether absent or `null`; the identifier is always owned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(deserialize_with = "null_as_default")]
    pub foto: String,
    #[serde(deserialize_with = "null_as_default")]
    pub descripcion: String,
    #[serde(deserialize_with = "null_as_default")]
    pub precio: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub talla: String,
    #[serde(deserialize_with = "null_as_default")]
    pub otras_propiedades: FieldMap,
}

impl Product {
    /// Mint a fresh server-side identifier, discarding whatever the client sent.
    pub fn with_new_id(mut self) -> Self {
        self.id = uuid::Uuid::new_v4().to_string();
        self
    }

    /// Pin the identifier to `id`; used when a body must not be able to move a record.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn to_document(&self) -> Result<FieldMap, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            // A struct always serializes to an object.
            other => Err(serde::ser::Error::custom(format!(
                "product serialized to non-object: {}",
                other
            ))),
        }
    }

    pub fn from_document(document: FieldMap) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(document))
    }
}

/// Drop keys a partial update is never allowed to write.
pub fn sanitize_update(mut fields: FieldMap) -> FieldMap {
    fields.remove(ID_FIELD);
    fields
}

// Stored documents may hold `null` after a partial update, so reads must accept it too.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
