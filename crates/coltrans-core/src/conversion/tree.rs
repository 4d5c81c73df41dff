//! Tree Builder
//!
//! Forward: rebuilds the nested v2 item tree from the flat v1 `folders[]` and
//! `requests[]` lists plus their order arrays. Every entity is indexed once
//! by id and handed out at most once; whatever no order array reaches is
//! appended at the root in declaration order.
//!
//! Reverse: flattens a v2 item tree back into v1 lists and order arrays.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

use super::v1_to_v2::ForwardMapper;
use super::v2_to_v1::ReverseMapper;
use crate::ids::resolve_id;
use crate::value::{non_empty_str, objects};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Iterate the usable ids of an order array
fn order_ids(order: Option<&Value>) -> impl Iterator<Item = &str> {
    order
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let id = non_empty_str(Some(entry));
            if id.is_none() {
                log::debug!("skipping unusable order entry {}", entry);
            }
            id
        })
}

fn index_by_id<'a>(entities: &[&'a Map<String, Value>]) -> HashMap<&'a str, usize> {
    let mut index = HashMap::new();
    for (position, entity) in entities.iter().copied().enumerate() {
        if let Some(id) = non_empty_str(entity.get("id")) {
            index.entry(id).or_insert(position);
        }
    }
    index
}

/// Single-pass forward tree builder
pub struct TreeBuilder<'a, 'm> {
    mapper: &'m ForwardMapper<'a>,
    folders: Vec<&'a Map<String, Value>>,
    requests: Vec<&'a Map<String, Value>>,
    folder_index: HashMap<&'a str, usize>,
    request_index: HashMap<&'a str, usize>,
    referenced: HashSet<&'a str>,
    consumed_folders: Vec<bool>,
    consumed_requests: Vec<bool>,
}

impl<'a, 'm> TreeBuilder<'a, 'm> {
    /// Index the entities of a v1 collection; malformed list members are
    /// dropped here
    pub fn new(collection: &'a Map<String, Value>, mapper: &'m ForwardMapper<'a>) -> Self {
        let folders: Vec<_> = objects(collection.get("folders")).collect();
        let requests: Vec<_> = objects(collection.get("requests")).collect();

        let mut referenced = HashSet::new();
        let holders = std::iter::once(collection).chain(folders.iter().copied());
        for holder in holders {
            referenced.extend(order_ids(holder.get("order")));
            referenced.extend(order_ids(holder.get("folders_order")));
        }

        log::debug!(
            "indexing {} folders and {} requests",
            folders.len(),
            requests.len()
        );

        Self {
            mapper,
            folder_index: index_by_id(&folders),
            request_index: index_by_id(&requests),
            consumed_folders: vec![false; folders.len()],
            consumed_requests: vec![false; requests.len()],
            folders,
            requests,
            referenced,
        }
    }

    /// Build the root item list of `collection`
    pub fn build(mut self, collection: &'a Map<String, Value>) -> Vec<Value> {
        let mut items = Vec::new();

        for id in order_ids(collection.get("folders_order")) {
            if let Some(item) = self.take_folder(id) {
                items.push(item);
            }
        }
        for id in order_ids(collection.get("order")) {
            if let Some(item) = self.take_any(id) {
                items.push(item);
            }
        }

        for position in 0..self.folders.len() {
            if !self.consumed_folders[position] {
                log::debug!("appending unreached folder #{} at the root", position);
                items.push(self.folder_at(position));
            }
        }
        for position in 0..self.requests.len() {
            if !self.consumed_requests[position] {
                log::debug!("appending unreached request #{} at the root", position);
                items.push(self.request_at(position));
            }
        }

        items
    }

    fn take_folder(&mut self, id: &str) -> Option<Value> {
        match self.folder_index.get(id).copied() {
            Some(position) if !self.consumed_folders[position] => Some(self.folder_at(position)),
            _ => {
                log::debug!("dropping folder reference {}", id);
                None
            }
        }
    }

    /// Folders are tried before requests
    fn take_any(&mut self, id: &str) -> Option<Value> {
        if let Some(&position) = self.folder_index.get(id) {
            if !self.consumed_folders[position] {
                return Some(self.folder_at(position));
            }
        }
        if let Some(&position) = self.request_index.get(id) {
            if !self.consumed_requests[position] {
                return Some(self.request_at(position));
            }
        }
        log::debug!("dropping order reference {}", id);
        None
    }

    fn request_at(&mut self, position: usize) -> Value {
        self.consumed_requests[position] = true;
        self.mapper.item(self.requests[position])
    }

    fn folder_at(&mut self, position: usize) -> Value {
        self.consumed_folders[position] = true;
        let folder = self.folders[position];
        let mut children = Vec::new();

        for id in order_ids(folder.get("folders_order")) {
            if let Some(item) = self.take_folder(id) {
                children.push(item);
            }
        }
        for id in order_ids(folder.get("order")) {
            if let Some(item) = self.take_any(id) {
                children.push(item);
            }
        }

        if let Some(folder_id) = non_empty_str(folder.get("id")) {
            for member in 0..self.folders.len() {
                if !self.consumed_folders[member]
                    && self.is_loose_member(self.folders[member], folder_id)
                {
                    children.push(self.folder_at(member));
                }
            }
            for member in 0..self.requests.len() {
                if !self.consumed_requests[member]
                    && self.is_loose_member(self.requests[member], folder_id)
                {
                    children.push(self.request_at(member));
                }
            }
        }

        self.mapper.folder(folder, children)
    }

    /// An entity that names `folder_id` as its parent and appears in no
    /// order array
    fn is_loose_member(&self, entity: &Map<String, Value>, folder_id: &str) -> bool {
        let parent = non_empty_str(entity.get("folder"))
            .or_else(|| non_empty_str(entity.get("folderId")));
        if parent != Some(folder_id) {
            return false;
        }
        non_empty_str(entity.get("id")).map_or(true, |id| !self.referenced.contains(id))
    }
}

/// Build the v2 item tree of a v1 collection
pub fn build_tree<'a>(
    collection: &'a Map<String, Value>,
    mapper: &ForwardMapper<'a>,
) -> Vec<Value> {
    TreeBuilder::new(collection, mapper).build(collection)
}

/// Flat v1 lists produced from a v2 item tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub folders: Vec<Value>,
    pub requests: Vec<Value>,
    /// Request ids at the root level
    pub order: Vec<Value>,
    /// Folder ids at the root level
    pub folders_order: Vec<Value>,
}

/// Whether a v2 item is a folder
pub fn is_item_group(item: &Map<String, Value>) -> bool {
    item.get("item").map_or(false, Value::is_array)
}

/// The id of a v2 item or `info` block: `_postman_id`, else `id`
pub fn item_id(item: &Map<String, Value>) -> Option<&Value> {
    item.get("_postman_id")
        .filter(|id| non_empty_str(Some(id)).is_some())
        .or_else(|| item.get("id"))
}

/// Flatten a v2 `item` list
pub fn flatten(items: Option<&Value>, mapper: &ReverseMapper<'_>) -> Flattened {
    let mut flattened = Flattened::default();
    let (order, folders_order) = walk(items, None, mapper, &mut flattened);
    flattened.order = order;
    flattened.folders_order = folders_order;
    flattened
}

/// Flatten one level, returning its request ids and folder ids
fn walk(
    items: Option<&Value>,
    parent: Option<&str>,
    mapper: &ReverseMapper<'_>,
    flattened: &mut Flattened,
) -> (Vec<Value>, Vec<Value>) {
    let mut order = Vec::new();
    let mut folders_order = Vec::new();

    for item in objects(items) {
        let id = resolve_id(item_id(item), mapper.context().retain_ids);

        if is_item_group(item) {
            let (child_order, child_folders) =
                walk(item.get("item"), Some(id.as_str()), mapper, flattened);
            flattened
                .folders
                .push(mapper.folder(item, &id, parent, child_order, child_folders));
            folders_order.push(Value::String(id));
        } else {
            flattened.requests.push(mapper.request(item, &id, parent));
            order.push(Value::String(id));
        }
    }

    (order, folders_order)
}
