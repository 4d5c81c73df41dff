//! v2 → v1 entity mapping
//!
//! v1 consumers read either the modern or the legacy encoding of auth and
//! scripts, so [`ReverseMapper`] writes both.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

use super::context::ConversionContext;
use super::tree::{self, is_item_group, item_id, Flattened};
use crate::codec::{body_to_v1, header_data, header_string, url_to_v1};
use crate::ids::{resolve_id, resolve_root_id};
use crate::resolver::{auth_to_v1, events_to_v1};
use crate::value::{copy_field, non_empty_str, objects, rename_field};
use serde_json::{Map, Value};

const DEFAULT_METHOD: &str = "GET";

/// Converts v2 entities into v1 ones under a fixed context
pub struct ReverseMapper<'a> {
    context: &'a ConversionContext,
    collection_id: Option<String>,
}

impl<'a> ReverseMapper<'a> {
    /// `collection_id` is stamped on every request as `collectionId`
    pub fn new(context: &'a ConversionContext, collection_id: Option<String>) -> Self {
        Self {
            context,
            collection_id,
        }
    }

    pub fn context(&self) -> &ConversionContext {
        self.context
    }

    /// Convert a v2 request item into a flat v1 request
    pub fn request(&self, item: &Map<String, Value>, id: &str, parent: Option<&str>) -> Value {
        let mut out = Map::new();
        out.insert("id".to_string(), Value::String(id.to_string()));
        out.insert(
            "name".to_string(),
            item.get("name")
                .filter(|name| name.is_string())
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
        );
        if let Some(collection_id) = &self.collection_id {
            out.insert(
                "collectionId".to_string(),
                Value::String(collection_id.clone()),
            );
        }
        if let Some(parent) = parent {
            out.insert("folder".to_string(), Value::String(parent.to_string()));
        }

        out.extend(self.request_fields(item.get("request")));
        out.extend(events_to_v1(item.get("event")));

        out.insert(
            "responses".to_string(),
            Value::Array(
                objects(item.get("response"))
                    .map(|response| self.response(response, Some(id)))
                    .collect(),
            ),
        );

        Value::Object(out)
    }

    /// The v1 fields describing a v2 `request`, which may be an object or a
    /// bare URL string
    pub fn request_fields(&self, request: Option<&Value>) -> Map<String, Value> {
        let shorthand;
        let empty = Map::new();
        let request = match request {
            Some(Value::Object(request)) => request,
            Some(Value::String(url)) => {
                let mut fields = Map::new();
                fields.insert("url".to_string(), Value::String(url.clone()));
                shorthand = fields;
                &shorthand
            }
            _ => &empty,
        };

        let descriptions = self.context.descriptions;
        let mut fields = Map::new();

        let method = non_empty_str(request.get("method")).unwrap_or(DEFAULT_METHOD);
        fields.insert("method".to_string(), Value::String(method.to_string()));

        if let Some(url) = url_to_v1(request.get("url")) {
            let mut query_params = Value::Array(url.query_params);
            let mut path_variables = Value::Array(url.path_variable_data);
            descriptions.clean_all(&mut query_params);
            descriptions.clean_all(&mut path_variables);

            fields.insert("url".to_string(), Value::String(url.url));
            fields.insert("queryParams".to_string(), query_params);
            fields.insert("pathVariableData".to_string(), path_variables);
        }

        let mut headers = Value::Array(header_data(request.get("header")));
        descriptions.clean_all(&mut headers);
        fields.insert("headerData".to_string(), headers);
        fields.insert(
            "headers".to_string(),
            Value::String(header_string(request.get("header"))),
        );

        let mut body = body_to_v1(request.get("body"));
        if let Some(data) = body.get_mut("data") {
            descriptions.clean_all(data);
        }
        fields.extend(body);

        fields.extend(auth_to_v1(request.get("auth")));
        descriptions.apply(&mut fields, request.get("description"));

        fields
    }

    /// Convert a v2 response
    ///
    /// `request_id` becomes the `request` reference when the response has
    /// no `originalRequest`.
    pub fn response(&self, response: &Map<String, Value>, request_id: Option<&str>) -> Value {
        let mut out = Map::new();
        out.insert(
            "id".to_string(),
            Value::String(resolve_id(response.get("id"), self.context.retain_ids)),
        );
        copy_field(&mut out, response, "name");

        match response.get("originalRequest") {
            Some(original) if original.is_object() || original.is_string() => {
                out.insert(
                    "request".to_string(),
                    Value::Object(self.request_fields(Some(original))),
                );
            }
            _ => {
                if let Some(request_id) = request_id {
                    out.insert("request".to_string(), Value::String(request_id.to_string()));
                }
            }
        }

        if response.contains_key("code") || response.contains_key("status") {
            let mut response_code = Map::new();
            rename_field(&mut response_code, response, "code", "code");
            rename_field(&mut response_code, response, "status", "name");
            out.insert("responseCode".to_string(), Value::Object(response_code));
        }

        rename_field(&mut out, response, "header", "headers");
        rename_field(&mut out, response, "cookie", "cookies");
        rename_field(&mut out, response, "body", "text");
        rename_field(&mut out, response, "responseTime", "time");
        rename_field(&mut out, response, "_postman_previewlanguage", "language");

        Value::Object(out)
    }

    /// Convert a v2 item group whose children have already been flattened
    pub fn folder(
        &self,
        item: &Map<String, Value>,
        id: &str,
        parent: Option<&str>,
        order: Vec<Value>,
        folders_order: Vec<Value>,
    ) -> Value {
        let mut out = Map::new();
        out.insert("id".to_string(), Value::String(id.to_string()));
        if let Some(name) = item.get("name").filter(|name| !name.is_null()) {
            out.insert("name".to_string(), name.clone());
        }
        self.context
            .descriptions
            .apply(&mut out, item.get("description"));
        if let Some(collection_id) = &self.collection_id {
            out.insert(
                "collectionId".to_string(),
                Value::String(collection_id.clone()),
            );
        }
        if let Some(parent) = parent {
            out.insert("folder".to_string(), Value::String(parent.to_string()));
        }

        out.extend(auth_to_v1(item.get("auth")));
        out.extend(events_to_v1(item.get("event")));

        out.insert("order".to_string(), Value::Array(order));
        out.insert("folders_order".to_string(), Value::Array(folders_order));

        Value::Object(out)
    }

    /// Assemble the v1 collection from its flattened tree
    pub fn collection(
        &self,
        collection: &Map<String, Value>,
        id: &str,
        flattened: Flattened,
    ) -> Value {
        let empty = Map::new();
        let info = collection
            .get("info")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let mut out = Map::new();
        out.insert("id".to_string(), Value::String(id.to_string()));
        if let Some(name) = info.get("name").filter(|name| !name.is_null()) {
            out.insert("name".to_string(), name.clone());
        }
        self.context
            .descriptions
            .apply(&mut out, info.get("description"));

        out.extend(auth_to_v1(collection.get("auth")));
        out.extend(events_to_v1(collection.get("event")));
        rename_field(&mut out, collection, "variable", "variables");

        out.insert("order".to_string(), Value::Array(flattened.order));
        out.insert(
            "folders_order".to_string(),
            Value::Array(flattened.folders_order),
        );
        out.insert("folders".to_string(), Value::Array(flattened.folders));
        out.insert("requests".to_string(), Value::Array(flattened.requests));

        Value::Object(out)
    }
}

/// Convert a whole v2 collection
pub fn convert_collection(context: &ConversionContext, collection: &Map<String, Value>) -> Value {
    let info = collection.get("info").and_then(Value::as_object);
    let id = resolve_root_id(info.and_then(item_id));

    let mapper = ReverseMapper::new(context, Some(id.clone()));
    let flattened = tree::flatten(collection.get("item"), &mapper);
    log::debug!(
        "flattened {} folders and {} requests",
        flattened.folders.len(),
        flattened.requests.len()
    );

    mapper.collection(collection, &id, flattened)
}

/// Convert a standalone v2 item, which is a folder when it has an `item` list
///
/// A folder converted on its own carries no members, so its order arrays
/// come out empty.
pub fn convert_single(context: &ConversionContext, item: &Map<String, Value>) -> Value {
    let mapper = ReverseMapper::new(context, None);
    let id = resolve_id(item_id(item), context.retain_ids);

    if is_item_group(item) {
        mapper.folder(item, &id, None, Vec::new(), Vec::new())
    } else {
        mapper.request(item, &id, None)
    }
}

/// Convert a standalone v2 response
pub fn convert_response(context: &ConversionContext, response: &Map<String, Value>) -> Value {
    ReverseMapper::new(context, None).response(response, None)
}
