//! Mercado Público API response models
//!
//! The purchase-order endpoint answers two kinds of requests with the same
//! envelope: a day listing (`fecha=DDMMYYYY`) and an order detail
//! (`codigo=...`). Both wrap their payload in a `Listado` array. Field names
//! follow the API's Spanish PascalCase.

use crate::domain::{LineItem, LooseValue, OrderCode, PurchaseOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Day listing response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListingResponse {
    /// Number of orders reported by the API
    #[serde(rename = "Cantidad", default)]
    pub cantidad: Option<LooseValue>,

    /// Listed orders
    #[serde(rename = "Listado", default)]
    pub listado: Option<Vec<ListingEntry>>,
}

impl ListingResponse {
    /// Order codes in listing order; entries without a usable code are dropped
    pub fn order_codes(&self) -> Vec<OrderCode> {
        self.listado
            .iter()
            .flatten()
            .filter_map(ListingEntry::code)
            .collect()
    }
}

/// One order in a day listing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListingEntry {
    /// Order code
    #[serde(rename = "Codigo", default)]
    pub codigo: Option<LooseValue>,

    /// Lowercase variant seen on some responses
    #[serde(rename = "codigo", default)]
    pub codigo_lower: Option<LooseValue>,

    /// Order name
    #[serde(rename = "Nombre", default)]
    pub nombre: Option<LooseValue>,
}

impl ListingEntry {
    /// `Codigo`, or `codigo` when the former is absent or empty
    pub fn code(&self) -> Option<OrderCode> {
        [&self.codigo, &self.codigo_lower]
            .into_iter()
            .flatten()
            .find(|value| !value.is_falsy())
            .and_then(|value| OrderCode::new(value.to_text()).ok())
    }
}

/// Picks the order object out of a detail response body.
///
/// A non-empty `Listado` array yields its first element; any other body is
/// taken as the order itself.
pub fn unwrap_detail(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("Listado") {
            Some(Value::Array(mut list)) if !list.is_empty() => list.swap_remove(0),
            Some(other) => {
                map.insert("Listado".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Order detail
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderDetail {
    /// Order date
    #[serde(rename = "Fecha", default)]
    pub fecha: Option<LooseValue>,

    /// Nested dates block
    #[serde(rename = "Fechas", default)]
    pub fechas: Option<OrderDates>,

    /// Buying organism (flat form)
    #[serde(rename = "NombreOrganismo", default)]
    pub nombre_organismo: Option<LooseValue>,

    /// Supplier name (flat form)
    #[serde(rename = "NombreProveedor", default)]
    pub nombre_proveedor: Option<LooseValue>,

    /// Buyer block
    #[serde(rename = "Comprador", default)]
    pub comprador: Option<BuyerDetail>,

    /// Supplier block
    #[serde(rename = "Proveedor", default)]
    pub proveedor: Option<SupplierDetail>,

    /// Line items
    #[serde(rename = "Items", default)]
    pub items: Option<ItemsField>,
}

/// Nested `Fechas` block
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderDates {
    /// Creation date
    #[serde(rename = "FechaCreacion", default)]
    pub fecha_creacion: Option<LooseValue>,
}

/// Nested `Comprador` block
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BuyerDetail {
    /// Buying organism
    #[serde(rename = "NombreOrganismo", default)]
    pub nombre_organismo: Option<LooseValue>,
}

/// Nested `Proveedor` block
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SupplierDetail {
    /// Supplier name
    #[serde(rename = "Nombre", default)]
    pub nombre: Option<LooseValue>,
}

/// `Items` is either a plain array or wrapped as `{"Listado": [...]}`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ItemsField {
    /// Plain array
    List(Vec<ItemDetail>),
    /// Wrapped array
    Wrapped {
        /// Items
        #[serde(rename = "Listado", default)]
        listado: Vec<ItemDetail>,
    },
}

impl ItemsField {
    fn into_vec(self) -> Vec<ItemDetail> {
        match self {
            ItemsField::List(items) => items,
            ItemsField::Wrapped { listado } => listado,
        }
    }
}

/// One line item of an order detail
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemDetail {
    /// Category code
    #[serde(rename = "CodigoCategoria", default)]
    pub codigo_categoria: Option<LooseValue>,

    /// Supplier specification
    #[serde(rename = "EspecificacionProveedor", default)]
    pub especificacion_proveedor: Option<LooseValue>,

    /// Buyer specification
    #[serde(rename = "EspecificacionComprador", default)]
    pub especificacion_comprador: Option<LooseValue>,

    /// Product name
    #[serde(rename = "NombreProducto", default)]
    pub nombre_producto: Option<LooseValue>,

    /// Product
    #[serde(rename = "Producto", default)]
    pub producto: Option<LooseValue>,

    /// Quantity
    #[serde(rename = "Cantidad", default)]
    pub cantidad: Option<LooseValue>,

    /// Unit
    #[serde(rename = "Unidad", default)]
    pub unidad: Option<LooseValue>,

    /// Net price
    #[serde(rename = "PrecioNeto", default)]
    pub precio_neto: Option<LooseValue>,
}

fn text(value: Option<&LooseValue>) -> Option<String> {
    value.map(LooseValue::to_text)
}

fn text_or_empty(value: Option<&LooseValue>) -> String {
    text(value).unwrap_or_default()
}

impl OrderDetail {
    /// Converts the detail into a domain order.
    ///
    /// `code` is the code the order was requested with; every line item
    /// carries it along with the order date, buyer and supplier.
    pub fn into_purchase_order(self, code: OrderCode) -> PurchaseOrder {
        let date = self
            .fecha
            .as_ref()
            .or_else(|| self.fechas.as_ref().and_then(|f| f.fecha_creacion.as_ref()));
        let buyer = self
            .nombre_organismo
            .as_ref()
            .or_else(|| self.comprador.as_ref().and_then(|c| c.nombre_organismo.as_ref()));
        let supplier = self
            .nombre_proveedor
            .as_ref()
            .or_else(|| self.proveedor.as_ref().and_then(|p| p.nombre.as_ref()));

        let mut order = PurchaseOrder::new(code);
        order.date = text_or_empty(date);
        order.buyer_name = text_or_empty(buyer);
        order.supplier_name = text_or_empty(supplier);

        order.items = self
            .items
            .map(ItemsField::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|item| LineItem {
                order_code: order.code.clone(),
                order_date: order.date.clone(),
                buyer_name: order.buyer_name.clone(),
                supplier_name: order.supplier_name.clone(),
                category_code: item.codigo_categoria,
                supplier_spec: text(item.especificacion_proveedor.as_ref()),
                buyer_spec: text(item.especificacion_comprador.as_ref()),
                product_name: text(item.nombre_producto.as_ref()),
                product: text(item.producto.as_ref()),
                quantity: item.cantidad,
                unit: text_or_empty(item.unidad.as_ref()),
                net_price: text_or_empty(item.precio_neto.as_ref()),
            })
            .collect();

        order
    }
}
