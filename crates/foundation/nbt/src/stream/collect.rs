use std::collections::{HashMap, HashSet};

use crate::tag::{NbtCompound, NbtList, NbtTag, NbtType};

use super::{EntryResult, StreamTagVisitor, ValueResult};


// ================================
//      CollectToTag
// ================================

#[derive(Debug)]
enum Container {
    List(NbtList),
    Compound(NbtCompound),
}

#[derive(Debug)]
struct Frame {
    container: Container,
    /// The key this container is stored under in its parent, if the parent is a compound.
    key:       Option<String>,
}

/// Rebuilds a tag tree from visitor events.
///
/// Single-entry compounds keyed by `""` are unwrapped as they are appended to a list, so a
/// mixed list written by the binary encoder comes back as the list that was written.
#[derive(Debug, Default)]
pub struct CollectToTag {
    stack:       Vec<Frame>,
    pending_key: Option<String>,
    result:      Option<NbtTag>,
}

impl CollectToTag {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of containers currently open.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The collected tree. If the decode stopped early, the containers still open are closed
    /// with whatever they had collected.
    pub fn into_result(mut self) -> Option<NbtTag> {
        while let Some(frame) = self.stack.pop() {
            self.append(frame.key, container_into_tag(frame.container));
        }
        self.result
    }

    fn enter_container_if_needed(&mut self, nbt_type: NbtType) {
        let container = match nbt_type {
            NbtType::List     => Container::List(NbtList::new()),
            NbtType::Compound => Container::Compound(NbtCompound::new()),
            _ => return,
        };
        let key = self.pending_key.take();
        self.stack.push(Frame { container, key });
    }

    fn append(&mut self, key: Option<String>, tag: NbtTag) {
        match self.stack.last_mut() {
            None => self.result = Some(tag),
            Some(Frame { container: Container::List(list), .. }) => list.push_unwrapped(tag),
            Some(Frame { container: Container::Compound(compound), .. }) => {
                compound.0.insert(key.unwrap_or_default(), tag);
            }
        }
    }

    #[inline]
    fn append_value(&mut self, tag: NbtTag) -> ValueResult {
        let key = self.pending_key.take();
        self.append(key, tag);
        ValueResult::Continue
    }
}

fn container_into_tag(container: Container) -> NbtTag {
    match container {
        Container::List(list)         => NbtTag::List(list),
        Container::Compound(compound) => NbtTag::Compound(compound),
    }
}

impl StreamTagVisitor for CollectToTag {
    fn visit_end(&mut self) -> ValueResult {
        self.append_value(NbtTag::End)
    }

    fn visit_byte(&mut self, value: i8) -> ValueResult {
        self.append_value(NbtTag::Byte(value))
    }

    fn visit_short(&mut self, value: i16) -> ValueResult {
        self.append_value(NbtTag::Short(value))
    }

    fn visit_int(&mut self, value: i32) -> ValueResult {
        self.append_value(NbtTag::Int(value))
    }

    fn visit_long(&mut self, value: i64) -> ValueResult {
        self.append_value(NbtTag::Long(value))
    }

    fn visit_float(&mut self, value: f32) -> ValueResult {
        self.append_value(NbtTag::Float(value))
    }

    fn visit_double(&mut self, value: f64) -> ValueResult {
        self.append_value(NbtTag::Double(value))
    }

    fn visit_string(&mut self, value: &str) -> ValueResult {
        self.append_value(NbtTag::String(value.to_owned()))
    }

    fn visit_byte_array(&mut self, value: &[i8]) -> ValueResult {
        self.append_value(NbtTag::ByteArray(value.to_vec()))
    }

    fn visit_int_array(&mut self, value: &[i32]) -> ValueResult {
        self.append_value(NbtTag::IntArray(value.to_vec()))
    }

    fn visit_long_array(&mut self, value: &[i64]) -> ValueResult {
        self.append_value(NbtTag::LongArray(value.to_vec()))
    }

    fn visit_list(&mut self, _element_type: NbtType, _len: usize) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_element(&mut self, element_type: NbtType, _index: usize) -> EntryResult {
        self.enter_container_if_needed(element_type);
        EntryResult::Enter
    }

    fn visit_entry(&mut self, _entry_type: NbtType) -> EntryResult {
        EntryResult::Enter
    }

    fn visit_entry_named(&mut self, entry_type: NbtType, key: &str) -> EntryResult {
        self.pending_key = Some(key.to_owned());
        self.enter_container_if_needed(entry_type);
        EntryResult::Enter
    }

    fn visit_container_end(&mut self) -> ValueResult {
        if let Some(frame) = self.stack.pop() {
            self.append(frame.key, container_into_tag(frame.container));
        }
        ValueResult::Continue
    }

    fn visit_root_entry(&mut self, root_type: NbtType) -> ValueResult {
        self.enter_container_if_needed(root_type);
        ValueResult::Continue
    }
}


// ================================
//      CollectFields
// ================================

/// One field to collect: the compound keys leading to it, its expected type, and its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    pub path:     Vec<String>,
    pub nbt_type: NbtType,
    pub name:     String,
}

impl FieldSelector {
    /// A field of the root compound.
    pub fn root<S: Into<String>>(nbt_type: NbtType, name: S) -> Self {
        Self {
            path: Vec::new(),
            nbt_type,
            name: name.into(),
        }
    }

    /// A field nested under the compounds named by `path`.
    pub fn nested<P, S>(path: P, nbt_type: NbtType, name: S) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            nbt_type,
            name: name.into(),
        }
    }
}

#[derive(Debug)]
struct FieldNode {
    /// The number of open containers while this node's compound is being read.
    depth:    usize,
    selected: HashMap<String, NbtType>,
    children: HashMap<String, usize>,
}

/// Collects only the selected fields of a root compound, skipping everything else, and halts
/// the decode as soon as every selected field has been read.
///
/// Fields live in compounds; paths only descend through compound keys.
#[derive(Debug)]
pub struct CollectFields {
    collector:     CollectToTag,
    nodes:         Vec<FieldNode>,
    stack:         Vec<usize>,
    missing:       usize,
    wanted_types:  HashSet<NbtType>,
}

impl CollectFields {
    pub fn new<I: IntoIterator<Item = FieldSelector>>(fields: I) -> Self {
        let mut nodes = vec![FieldNode {
            depth:    1,
            selected: HashMap::new(),
            children: HashMap::new(),
        }];
        let mut wanted_types = HashSet::from([NbtType::Compound]);
        let mut missing = 0;

        for field in fields {
            let mut node = 0;
            for segment in field.path {
                node = match nodes[node].children.get(&segment) {
                    Some(&child) => child,
                    None => {
                        let child = nodes.len();
                        let depth = nodes[node].depth + 1;
                        nodes.push(FieldNode {
                            depth,
                            selected: HashMap::new(),
                            children: HashMap::new(),
                        });
                        nodes[node].children.insert(segment, child);
                        child
                    }
                };
            }
            if nodes[node].selected.insert(field.name, field.nbt_type).is_none() {
                missing += 1;
            }
            wanted_types.insert(field.nbt_type);
        }

        Self {
            collector: CollectToTag::new(),
            nodes,
            stack: vec![0],
            missing,
            wanted_types,
        }
    }

    /// The number of selected fields not seen so far.
    #[inline]
    pub fn missing_field_count(&self) -> usize {
        self.missing
    }

    /// A compound holding the collected fields at their paths.
    #[inline]
    pub fn into_result(self) -> Option<NbtTag> {
        self.collector.into_result()
    }

    #[inline]
    fn current(&self) -> &FieldNode {
        let index = self.stack.last().copied().unwrap_or(0);
        &self.nodes[index]
    }
}

impl StreamTagVisitor for CollectFields {
    fn visit_end(&mut self) -> ValueResult {
        self.collector.visit_end()
    }

    fn visit_byte(&mut self, value: i8) -> ValueResult {
        self.collector.visit_byte(value)
    }

    fn visit_short(&mut self, value: i16) -> ValueResult {
        self.collector.visit_short(value)
    }

    fn visit_int(&mut self, value: i32) -> ValueResult {
        self.collector.visit_int(value)
    }

    fn visit_long(&mut self, value: i64) -> ValueResult {
        self.collector.visit_long(value)
    }

    fn visit_float(&mut self, value: f32) -> ValueResult {
        self.collector.visit_float(value)
    }

    fn visit_double(&mut self, value: f64) -> ValueResult {
        self.collector.visit_double(value)
    }

    fn visit_string(&mut self, value: &str) -> ValueResult {
        self.collector.visit_string(value)
    }

    fn visit_byte_array(&mut self, value: &[i8]) -> ValueResult {
        self.collector.visit_byte_array(value)
    }

    fn visit_int_array(&mut self, value: &[i32]) -> ValueResult {
        self.collector.visit_int_array(value)
    }

    fn visit_long_array(&mut self, value: &[i64]) -> ValueResult {
        self.collector.visit_long_array(value)
    }

    fn visit_list(&mut self, element_type: NbtType, len: usize) -> ValueResult {
        self.collector.visit_list(element_type, len)
    }

    fn visit_element(&mut self, element_type: NbtType, index: usize) -> EntryResult {
        self.collector.visit_element(element_type, index)
    }

    fn visit_entry(&mut self, entry_type: NbtType) -> EntryResult {
        if self.collector.depth() > self.current().depth {
            self.collector.visit_entry(entry_type)
        } else if self.missing == 0 {
            EntryResult::Halt
        } else if !self.wanted_types.contains(&entry_type) {
            EntryResult::Skip
        } else {
            self.collector.visit_entry(entry_type)
        }
    }

    fn visit_entry_named(&mut self, entry_type: NbtType, key: &str) -> EntryResult {
        let node_index = self.stack.last().copied().unwrap_or(0);
        if self.collector.depth() > self.nodes[node_index].depth {
            return self.collector.visit_entry_named(entry_type, key);
        }

        let node = &mut self.nodes[node_index];
        if node.selected.get(key) == Some(&entry_type) {
            node.selected.remove(key);
            self.missing -= 1;
            return self.collector.visit_entry_named(entry_type, key);
        }

        if entry_type == NbtType::Compound {
            if let Some(&child) = node.children.get(key) {
                self.stack.push(child);
                return self.collector.visit_entry_named(entry_type, key);
            }
        }
        EntryResult::Skip
    }

    fn visit_container_end(&mut self) -> ValueResult {
        if self.collector.depth() == self.current().depth {
            self.stack.pop();
        }
        self.collector.visit_container_end()
    }

    fn visit_root_entry(&mut self, root_type: NbtType) -> ValueResult {
        if root_type == NbtType::Compound {
            self.collector.visit_root_entry(root_type)
        } else {
            ValueResult::Halt
        }
    }
}


// ================================
//      SkipAll
// ================================

/// Consumes a payload without visiting anything inside it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipAll;

impl StreamTagVisitor for SkipAll {
    fn visit_end(&mut self) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_byte(&mut self, _value: i8) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_short(&mut self, _value: i16) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_int(&mut self, _value: i32) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_long(&mut self, _value: i64) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_float(&mut self, _value: f32) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_double(&mut self, _value: f64) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_string(&mut self, _value: &str) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_byte_array(&mut self, _value: &[i8]) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_int_array(&mut self, _value: &[i32]) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_long_array(&mut self, _value: &[i64]) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_list(&mut self, _element_type: NbtType, _len: usize) -> ValueResult {
        ValueResult::Break
    }

    fn visit_element(&mut self, _element_type: NbtType, _index: usize) -> EntryResult {
        EntryResult::Skip
    }

    fn visit_entry(&mut self, _entry_type: NbtType) -> EntryResult {
        EntryResult::Skip
    }

    fn visit_entry_named(&mut self, _entry_type: NbtType, _key: &str) -> EntryResult {
        EntryResult::Skip
    }

    fn visit_container_end(&mut self) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_root_entry(&mut self, _root_type: NbtType) -> ValueResult {
        ValueResult::Continue
    }
}
