//! v1 → v2 entity mapping
//!
//! [`ForwardMapper`] converts individual v1 entities (requests, responses,
//! folders, collections) into their v2 shapes. Tree reconstruction lives in
//! [`super::tree`]; the mapper only ever sees one entity plus, for folders
//! and collections, its already converted children.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

use super::context::ConversionContext;
use super::tree::build_tree;
use crate::codec::{body_from_v1, parse_header_string, url_from_v1};
use crate::ids::{resolve_id, resolve_root_id};
use crate::resolver::{auth_from_v1, events_from_v1, is_noauth};
use crate::value::{
    enabled_to_disabled, is_absent, non_empty_str, normalize_type_tag, objects, rename_field,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Converts v1 entities into v2 ones under a fixed context
pub struct ForwardMapper<'a> {
    context: &'a ConversionContext,
    requests: HashMap<&'a str, &'a Map<String, Value>>,
}

impl<'a> ForwardMapper<'a> {
    pub fn new(context: &'a ConversionContext) -> Self {
        Self {
            context,
            requests: HashMap::new(),
        }
    }

    /// Index requests so responses can refer to them by id
    pub fn with_requests<I>(mut self, requests: I) -> Self
    where
        I: IntoIterator<Item = &'a Map<String, Value>>,
    {
        for request in requests {
            if let Some(id) = non_empty_str(request.get("id")) {
                self.requests.entry(id).or_insert(request);
            }
        }
        self
    }

    pub fn context(&self) -> &ConversionContext {
        self.context
    }

    /// Convert a v1 request into a v2 request item
    pub fn item(&self, request: &Map<String, Value>) -> Value {
        let mut item = Map::new();
        item.insert(
            "_postman_id".to_string(),
            Value::String(resolve_id(request.get("id"), self.context.retain_ids)),
        );
        item.insert(
            "name".to_string(),
            request
                .get("name")
                .filter(|name| name.is_string())
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
        );
        if let Some(events) = events_from_v1(request, self.context.prioritize_v2) {
            item.insert("event".to_string(), events);
        }
        item.insert("request".to_string(), self.request(request));
        item.insert(
            "response".to_string(),
            Value::Array(
                objects(request.get("responses"))
                    .map(|response| self.response(response))
                    .collect(),
            ),
        );

        Value::Object(item)
    }

    /// Build the v2 `request` object of a v1 request
    pub fn request(&self, request: &Map<String, Value>) -> Value {
        let descriptions = self.context.descriptions;
        let mut out = Map::new();

        if let Some(auth) = auth_from_v1(request, self.context.prioritize_v2) {
            out.insert("auth".to_string(), auth);
        }

        let mut body = body_from_v1(request);
        let mode = body.get("mode").and_then(Value::as_str).map(str::to_string);
        if let Some(pairs) = mode.and_then(|mode| body.get_mut(&mode)) {
            descriptions.clean_all(pairs);
        }
        out.insert("body".to_string(), body);

        descriptions.apply(&mut out, request.get("description"));
        out.insert("header".to_string(), Value::Array(self.headers(request)));

        if let Some(method) = non_empty_str(request.get("method")) {
            out.insert("method".to_string(), Value::String(method.to_string()));
        }

        match url_from_v1(request) {
            Some(Value::Object(mut url)) => {
                for key in ["query", "variable"] {
                    if let Some(pairs) = url.get_mut(key) {
                        descriptions.clean_all(pairs);
                    }
                }
                out.insert("url".to_string(), Value::Object(url));
            }
            Some(url) => {
                out.insert("url".to_string(), url);
            }
            None => {}
        }

        Value::Object(out)
    }

    /// `headerData` wins; the legacy `headers` field is read as either a
    /// list of header objects or a `Key: Value` string.
    fn headers(&self, request: &Map<String, Value>) -> Vec<Value> {
        let structured: Vec<Value> = match request.get("headerData") {
            Some(Value::Array(_)) => objects(request.get("headerData"))
                .map(|header| Value::Object(header.clone()))
                .collect(),
            _ => match request.get("headers") {
                Some(Value::Array(_)) => objects(request.get("headers"))
                    .map(|header| Value::Object(header.clone()))
                    .collect(),
                Some(Value::String(headers)) => parse_header_string(headers),
                _ => Vec::new(),
            },
        };

        structured
            .into_iter()
            .map(|mut header| {
                if let Value::Object(pair) = &mut header {
                    enabled_to_disabled(pair);
                    normalize_type_tag(pair);
                    self.context.descriptions.clean(pair);
                }
                header
            })
            .collect()
    }

    /// Convert a v1 response
    pub fn response(&self, response: &Map<String, Value>) -> Value {
        let mut out = Map::new();
        out.insert(
            "id".to_string(),
            Value::String(resolve_id(response.get("id"), self.context.retain_ids)),
        );
        if let Some(name) = response.get("name").filter(|name| name.is_string()) {
            out.insert("name".to_string(), name.clone());
        }

        if let Some(original) = self.original_request(response.get("request")) {
            out.insert("originalRequest".to_string(), original);
        }

        let response_code = response.get("responseCode").and_then(Value::as_object);
        if let Some(status) = response_code.and_then(|code| code.get("name")) {
            out.insert("status".to_string(), status.clone());
        }
        let code = response_code
            .and_then(|code| code.get("code"))
            .filter(|code| !code.is_null())
            .or_else(|| response.get("code").filter(|code| !code.is_null()));
        if let Some(code) = code {
            out.insert("code".to_string(), code.clone());
        }

        rename_field(&mut out, response, "language", "_postman_previewlanguage");
        rename_field(&mut out, response, "headers", "header");
        rename_field(&mut out, response, "cookies", "cookie");
        rename_field(&mut out, response, "time", "responseTime");

        let body = response
            .get("text")
            .filter(|text| text.is_string())
            .or_else(|| response.get("dataURI").filter(|uri| uri.is_string()));
        if let Some(body) = body {
            out.insert("body".to_string(), body.clone());
        }

        Value::Object(out)
    }

    /// The embedded request of a response
    ///
    /// A string is looked up among the collection's requests first and
    /// treated as a URL when no request carries that id.
    fn original_request(&self, request: Option<&Value>) -> Option<Value> {
        match request? {
            Value::Object(request) => Some(self.request(request)),
            Value::String(reference) if !reference.is_empty() => {
                match self.requests.get(reference.as_str()) {
                    Some(request) => Some(self.request(request)),
                    None => {
                        let mut request = Map::new();
                        request.insert("url".to_string(), Value::String(reference.clone()));
                        Some(self.request(&request))
                    }
                }
            }
            _ => None,
        }
    }

    /// Convert a v1 folder whose children have already been converted
    pub fn folder(&self, folder: &Map<String, Value>, children: Vec<Value>) -> Value {
        let mut out = Map::new();
        out.insert(
            "_postman_id".to_string(),
            Value::String(resolve_id(folder.get("id"), self.context.retain_ids)),
        );
        if let Some(name) = folder.get("name").filter(|name| !name.is_null()) {
            out.insert("name".to_string(), name.clone());
        }
        self.context
            .descriptions
            .apply(&mut out, folder.get("description"));
        if let Some(auth) = auth_from_v1(folder, self.context.prioritize_v2) {
            out.insert("auth".to_string(), auth);
        }
        if let Some(events) = events_from_v1(folder, self.context.prioritize_v2) {
            out.insert("event".to_string(), events);
        }
        out.insert("item".to_string(), Value::Array(children));

        Value::Object(out)
    }

    /// Convert a v1 collection whose tree has already been built
    pub fn collection(&self, collection: &Map<String, Value>, items: Vec<Value>) -> Value {
        let mut info = Map::new();
        info.insert(
            "_postman_id".to_string(),
            Value::String(resolve_root_id(collection.get("id"))),
        );
        if let Some(name) = collection.get("name").filter(|name| !name.is_null()) {
            info.insert("name".to_string(), name.clone());
        }
        self.context
            .descriptions
            .apply(&mut info, collection.get("description"));
        info.insert(
            "schema".to_string(),
            Value::String(self.context.schema_url()),
        );

        let mut out = Map::new();
        out.insert("info".to_string(), Value::Object(info));
        out.insert("item".to_string(), Value::Array(items));

        // a root `noauth` is dropped; folders and requests keep theirs
        if let Some(auth) = auth_from_v1(collection, self.context.prioritize_v2)
            .filter(|auth| !is_noauth(auth))
        {
            out.insert("auth".to_string(), auth);
        }
        if let Some(events) = events_from_v1(collection, self.context.prioritize_v2) {
            out.insert("event".to_string(), events);
        }

        let variables: Vec<Value> = objects(collection.get("variables"))
            .map(|variable| {
                let mut variable = variable.clone();
                normalize_type_tag(&mut variable);
                Value::Object(variable)
            })
            .collect();
        if !variables.is_empty() {
            out.insert("variable".to_string(), Value::Array(variables));
        }

        Value::Object(out)
    }
}

/// Whether a standalone v1 entity is a folder rather than a request
pub fn is_folder(entity: &Map<String, Value>) -> bool {
    let has_order = entity.get("order").map_or(false, Value::is_array)
        || entity.get("folders_order").map_or(false, Value::is_array);
    has_order && is_absent(entity.get("url")) && is_absent(entity.get("method"))
}

/// Convert a whole v1 collection
pub fn convert_collection(context: &ConversionContext, collection: &Map<String, Value>) -> Value {
    let mapper = ForwardMapper::new(context).with_requests(objects(collection.get("requests")));
    let items = build_tree(collection, &mapper);
    mapper.collection(collection, items)
}

/// Convert a standalone v1 request or folder
///
/// A folder converted on its own has no access to its members and comes out
/// with an empty `item` list.
pub fn convert_single(context: &ConversionContext, entity: &Map<String, Value>) -> Value {
    let mapper = ForwardMapper::new(context);
    if is_folder(entity) {
        mapper.folder(entity, Vec::new())
    } else {
        mapper.item(entity)
    }
}

/// Convert a standalone v1 response
pub fn convert_response(context: &ConversionContext, response: &Map<String, Value>) -> Value {
    ForwardMapper::new(context).response(response)
}
