//! Live-parameter debug panel.
//!
//! Controls are registered against live scene objects through a validated
//! accessor pair rather than by property name, so a bad binding is caught at
//! registration time instead of surfacing mid-frame. The panel owns only the
//! control tree; targets stay owned by the scene and are held weakly here.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::error::{ConfigError, PanelError};

/// Dynamic value flowing through a binding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Bool(bool),
}

impl ControlValue {
    #[inline]
    pub fn as_number(self) -> Option<f32> {
        match self {
            ControlValue::Number(n) => Some(n),
            ControlValue::Bool(_) => None,
        }
    }

    #[inline]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            ControlValue::Bool(b) => Some(b),
            ControlValue::Number(_) => None,
        }
    }
}

/// What kind of widget a control renders as, and how numeric input is shaped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlKind {
    Range { min: f32, max: f32, step: f32 },
    Toggle,
}

type Getter = Box<dyn Fn() -> Option<ControlValue>>;
type Setter = Box<dyn FnMut(ControlValue) -> bool>;

/// Callback invoked after a user-driven value change has been written through.
pub type ChangeCallback = Box<dyn FnMut(ControlValue)>;

/// Accessor pair into a live target.
///
/// The target is captured as a `Weak` reference; the scene governs its
/// lifetime. A dead target makes reads return `None` and writes no-ops.
pub struct Binding {
    get: Getter,
    set: Setter,
}

impl Binding {
    /// Bind a numeric field of a shared target.
    pub fn number<T, G, S>(target: &Rc<RefCell<T>>, get: G, set: S) -> Self
    where
        T: 'static,
        G: Fn(&T) -> f32 + 'static,
        S: Fn(&mut T, f32) + 'static,
    {
        let weak_get = Rc::downgrade(target);
        let weak_set: Weak<RefCell<T>> = weak_get.clone();
        Binding {
            get: Box::new(move || {
                weak_get
                    .upgrade()
                    .map(|t| ControlValue::Number(get(&t.borrow())))
            }),
            set: Box::new(move |value| match (weak_set.upgrade(), value) {
                (Some(t), ControlValue::Number(n)) => {
                    set(&mut t.borrow_mut(), n);
                    true
                }
                _ => false,
            }),
        }
    }

    /// Bind a boolean field of a shared target.
    pub fn toggle<T, G, S>(target: &Rc<RefCell<T>>, get: G, set: S) -> Self
    where
        T: 'static,
        G: Fn(&T) -> bool + 'static,
        S: Fn(&mut T, bool) + 'static,
    {
        let weak_get = Rc::downgrade(target);
        let weak_set: Weak<RefCell<T>> = weak_get.clone();
        Binding {
            get: Box::new(move || {
                weak_get
                    .upgrade()
                    .map(|t| ControlValue::Bool(get(&t.borrow())))
            }),
            set: Box::new(move |value| match (weak_set.upgrade(), value) {
                (Some(t), ControlValue::Bool(b)) => {
                    set(&mut t.borrow_mut(), b);
                    true
                }
                _ => false,
            }),
        }
    }

    /// Read the target's current value, `None` if the target is gone.
    #[inline]
    pub fn read(&self) -> Option<ControlValue> {
        (self.get)()
    }

    #[inline]
    fn write(&mut self, value: ControlValue) -> bool {
        (self.set)(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NodeId(u32);

/// Handle to a group node in the control tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(NodeId);

/// Handle to a leaf control in the control tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlId(NodeId);

struct GroupNode {
    name: String,
    collapsed: bool,
    children: SmallVec<[NodeId; 8]>,
}

struct ControlNode {
    label: String,
    kind: ControlKind,
    binding: Binding,
    on_change: Option<ChangeCallback>,
}

enum Node {
    Group(GroupNode),
    Control(ControlNode),
}

/// One entry of a group's child list, as seen by the UI collaborator.
pub enum PanelEntry {
    Group {
        id: GroupId,
        name: String,
        collapsed: bool,
    },
    Control {
        id: ControlId,
        label: String,
        kind: ControlKind,
        value: Option<ControlValue>,
    },
}

/// Hierarchical registry of bound controls.
///
/// All mutation entry points are synchronous: a value change is written
/// through to its target and the change callback has run before the call
/// returns, so the next rendered frame always sees the new state.
pub struct ParameterPanel {
    nodes: FnvHashMap<NodeId, Node>,
    root: NodeId,
    next_id: u32,
}

impl Default for ParameterPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterPanel {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = FnvHashMap::default();
        nodes.insert(
            root,
            Node::Group(GroupNode {
                name: String::new(),
                collapsed: false,
                children: SmallVec::new(),
            }),
        );
        ParameterPanel {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// The implicit top-level group every panel starts with.
    #[inline]
    pub fn root(&self) -> GroupId {
        GroupId(self.root)
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn group_mut(&mut self, id: GroupId) -> Result<&mut GroupNode, PanelError> {
        match self.nodes.get_mut(&id.0) {
            Some(Node::Group(g)) => Ok(g),
            _ => Err(PanelError::UnknownGroup),
        }
    }

    fn control_mut(&mut self, id: ControlId) -> Result<&mut ControlNode, PanelError> {
        match self.nodes.get_mut(&id.0) {
            Some(Node::Control(c)) => Ok(c),
            _ => Err(PanelError::UnknownControl),
        }
    }

    /// Create a nested, initially expanded group. Names need not be unique.
    pub fn add_group(&mut self, parent: GroupId, name: &str) -> Result<GroupId, PanelError> {
        self.group_mut(parent)?;
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node::Group(GroupNode {
                name: name.to_string(),
                collapsed: false,
                children: SmallVec::new(),
            }),
        );
        // parent re-checked above, push cannot fail
        if let Ok(g) = self.group_mut(parent) {
            g.children.push(id);
        }
        Ok(GroupId(id))
    }

    /// Register a control bound to a live target.
    ///
    /// The binding is validated once, here: the target must be alive and its
    /// current value must match `kind`. A failed registration leaves the tree
    /// untouched.
    pub fn add_control(
        &mut self,
        group: GroupId,
        label: &str,
        kind: ControlKind,
        binding: Binding,
        on_change: Option<ChangeCallback>,
    ) -> Result<ControlId, PanelError> {
        self.group_mut(group)?;
        validate_kind(kind)?;
        let current = binding.read().ok_or(PanelError::TargetDropped)?;
        match (kind, current) {
            (ControlKind::Range { .. }, ControlValue::Number(n)) => {
                if !n.is_finite() {
                    return Err(PanelError::NonFiniteValue);
                }
            }
            (ControlKind::Toggle, ControlValue::Bool(_)) => {}
            _ => return Err(PanelError::TypeMismatch),
        }

        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node::Control(ControlNode {
                label: label.to_string(),
                kind,
                binding,
                on_change,
            }),
        );
        if let Ok(g) = self.group_mut(group) {
            g.children.push(id);
        }
        log::debug!("[panel] registered control '{label}'");
        Ok(ControlId(id))
    }

    /// User-driven value change entry point.
    ///
    /// Range values are clamped into `[min, max]` and snapped to the step
    /// grid before being written through; the change callback receives the
    /// value as applied. Returns the applied value.
    ///
    /// The callback must not re-enter the panel; it runs while the control
    /// tree is borrowed.
    pub fn set_value(
        &mut self,
        id: ControlId,
        value: ControlValue,
    ) -> Result<ControlValue, PanelError> {
        let control = self.control_mut(id)?;
        let applied = match (control.kind, value) {
            (ControlKind::Range { min, max, step }, ControlValue::Number(n)) => {
                ControlValue::Number(snap_to_step(n, min, max, step))
            }
            (ControlKind::Toggle, ControlValue::Bool(b)) => ControlValue::Bool(b),
            _ => return Err(PanelError::TypeMismatch),
        };
        if !control.binding.write(applied) {
            log::warn!(
                "[panel] write to '{}' dropped: target is gone",
                control.label
            );
            return Ok(applied);
        }
        if let Some(cb) = control.on_change.as_mut() {
            cb(applied);
        }
        Ok(applied)
    }

    /// Current value of a control, read through its binding.
    pub fn value(&self, id: ControlId) -> Option<ControlValue> {
        match self.nodes.get(&id.0) {
            Some(Node::Control(c)) => c.binding.read(),
            _ => None,
        }
    }

    /// Presentational collapse flag; bound values are unaffected.
    pub fn set_collapsed(&mut self, group: GroupId, collapsed: bool) -> Result<(), PanelError> {
        self.group_mut(group)?.collapsed = collapsed;
        Ok(())
    }

    pub fn is_collapsed(&self, group: GroupId) -> Result<bool, PanelError> {
        match self.nodes.get(&group.0) {
            Some(Node::Group(g)) => Ok(g.collapsed),
            _ => Err(PanelError::UnknownGroup),
        }
    }

    /// A group's children in insertion order, for the UI collaborator.
    pub fn children(&self, group: GroupId) -> Result<Vec<PanelEntry>, PanelError> {
        let g = match self.nodes.get(&group.0) {
            Some(Node::Group(g)) => g,
            _ => return Err(PanelError::UnknownGroup),
        };
        let mut out = Vec::with_capacity(g.children.len());
        for &child in &g.children {
            match self.nodes.get(&child) {
                Some(Node::Group(cg)) => out.push(PanelEntry::Group {
                    id: GroupId(child),
                    name: cg.name.clone(),
                    collapsed: cg.collapsed,
                }),
                Some(Node::Control(cc)) => out.push(PanelEntry::Control {
                    id: ControlId(child),
                    label: cc.label.clone(),
                    kind: cc.kind,
                    value: cc.binding.read(),
                }),
                None => {}
            }
        }
        Ok(out)
    }
}

fn validate_kind(kind: ControlKind) -> Result<(), ConfigError> {
    if let ControlKind::Range { min, max, step } = kind {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFinite { name: "range bound" });
        }
        if min > max {
            return Err(ConfigError::InvertedRange { min, max });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::NonPositiveStep { step });
        }
    }
    Ok(())
}

/// Clamp into `[min, max]`, then snap to the nearest step multiple anchored
/// at `min`. Snapping can overshoot `max` by up to half a step, so clamp
/// again afterwards.
#[inline]
pub fn snap_to_step(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let clamped = value.clamp(min, max);
    let snapped = min + ((clamped - min) / step).round() * step;
    snapped.clamp(min, max)
}
