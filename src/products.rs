//! Product operations built on the gateway.
//!
//! Each operation is one rate-limited Admin API call; bodies are returned as
//! [`serde_json::Value`] for the caller to pick apart.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_gateway::{GatewayConfig, RequestGateway};
//!
//! let gateway = RequestGateway::new(&GatewayConfig::from_env()?)?;
//!
//! let product = gateway.get_product(632910392).await?;
//! gateway.update_inventory(632910392, &[(808950810, 12), (49148385, 0)]).await?;
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::clients::{HttpError, HttpMethod, HttpRequest, Transport};
use crate::gateway::RequestGateway;

/// New inventory quantity for one product variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VariantInventory {
    /// The variant ID.
    pub id: u64,
    /// The quantity to set.
    pub inventory_quantity: i64,
}

#[derive(Serialize)]
struct ProductUpdate<'a> {
    product: VariantsUpdate<'a>,
}

#[derive(Serialize)]
struct VariantsUpdate<'a> {
    variants: &'a [VariantInventory],
}

/// A product metafield holding a JSON-encoded string value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StringMetafield {
    /// Metafield namespace.
    pub namespace: String,
    /// Metafield key.
    pub key: String,
    /// The stored value.
    pub value: String,
    /// Always `"string"`.
    pub value_type: &'static str,
}

#[derive(Serialize)]
struct MetafieldCreate<'a> {
    metafield: &'a StringMetafield,
}

impl<T: Transport> RequestGateway<T> {
    /// Fetches one product, returning the `product` member of the response.
    ///
    /// Returns `Value::Null` if the response has no `product` member.
    ///
    /// # Errors
    ///
    /// See [`send`](RequestGateway::send).
    pub async fn get_product(&self, id: u64) -> Result<Value, HttpError> {
        let mut body: Value = self
            .send_json(HttpRequest::builder(HttpMethod::Get, format!("products/{id}.json")).build()?)
            .await?;
        Ok(body
            .get_mut("product")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    /// Lists the ID and title of every product on the first page.
    ///
    /// # Errors
    ///
    /// See [`send`](RequestGateway::send).
    pub async fn get_products_id_title(&self) -> Result<Value, HttpError> {
        self.send_json(
            HttpRequest::builder(HttpMethod::Get, "products.json?fields=id,title").build()?,
        )
        .await
    }

    /// Sets the inventory quantity of several variants of one product.
    ///
    /// `quantities` holds `(variant_id, quantity)` pairs.
    ///
    /// # Errors
    ///
    /// See [`send`](RequestGateway::send).
    pub async fn update_inventory(
        &self,
        id: u64,
        quantities: &[(u64, i64)],
    ) -> Result<Value, HttpError> {
        let variants: Vec<VariantInventory> = quantities
            .iter()
            .map(|&(variant_id, inventory_quantity)| VariantInventory {
                id: variant_id,
                inventory_quantity,
            })
            .collect();
        let body = serde_json::to_value(ProductUpdate {
            product: VariantsUpdate {
                variants: &variants,
            },
        })?;

        self.send_json(
            HttpRequest::builder(HttpMethod::Put, format!("products/{id}.json"))
                .body(body)
                .build()?,
        )
        .await
    }

    /// Stores `map` on a product as a single JSON-encoded string metafield.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Json`] if `map` cannot be serialized, otherwise
    /// see [`send`](RequestGateway::send).
    pub async fn set_product_metafield_map<M: Serialize + Sync>(
        &self,
        id: u64,
        namespace: &str,
        key: &str,
        map: &M,
    ) -> Result<Value, HttpError> {
        let metafield = StringMetafield {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: serde_json::to_string(map)?,
            value_type: "string",
        };
        let body = serde_json::to_value(MetafieldCreate {
            metafield: &metafield,
        })?;

        self.send_json(
            HttpRequest::builder(HttpMethod::Post, format!("products/{id}/metafields.json"))
                .body(body)
                .build()?,
        )
        .await
    }
}
