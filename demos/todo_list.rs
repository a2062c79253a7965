//! Todo list screen: tagged node discovery, list and map bindings

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bindery::discovery::{map_tagged_nodes, TaggedNode};
use bindery::{Binder, BindingHooks, BindingLayout, FieldChange, FrameQueue, ObservableMap, ObservableVec};
use tracing_subscriber::EnvFilter;

const ITEMS: usize = 0;
const DONE: usize = 1;

/// A minimal presentation tree node with a text slot.
#[derive(Clone, Debug)]
struct Widget(Rc<WidgetData>);

#[derive(Debug)]
struct WidgetData {
    tag: Option<&'static str>,
    id: Option<u32>,
    text: RefCell<String>,
    children: Vec<Widget>,
}

impl Widget {
    fn new(tag: Option<&'static str>, id: Option<u32>, children: Vec<Widget>) -> Self {
        Widget(Rc::new(WidgetData {
            tag,
            id,
            text: RefCell::new(String::new()),
            children,
        }))
    }

    fn set_text(&self, text: String) {
        *self.0.text.borrow_mut() = text;
    }

    fn text(&self) -> String {
        self.0.text.borrow().clone()
    }
}

impl TaggedNode for Widget {
    fn tag(&self) -> Option<&str> {
        self.0.tag
    }

    fn id(&self) -> Option<u32> {
        self.0.id
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.clone()
    }
}

/// Bound widgets, indexed by slot.
struct TodoBindings {
    slots: Vec<Option<Widget>>,
}

impl TodoBindings {
    fn render(&self, slot: usize, text: String) {
        if let Some(Some(widget)) = self.slots.get(slot) {
            widget.set_text(text);
        }
    }
}

impl BindingHooks<Widget> for TodoBindings {
    fn on_field_change(&self, _: &Binder<Widget>, _: &FieldChange<'_>) -> bool {
        true
    }

    fn rebind_dirty(&self, binder: &Binder<Widget>) {
        let items = binder.observed::<ObservableVec<String>>(ITEMS);
        let done = binder.observed::<ObservableMap<String, bool>>(DONE);

        if let Some(items) = &items {
            let lines = items.with(|items| {
                items
                    .iter()
                    .map(|item| {
                        let checked = done
                            .as_ref()
                            .and_then(|done| done.get(item))
                            .unwrap_or(false);
                        format!("[{}] {item}", if checked { 'x' } else { ' ' })
                    })
                    .collect::<Vec<_>>()
            });
            self.render(ITEMS, lines.join("\n"));
        }

        if let Some(done) = &done {
            let finished = done.with(|done| done.values().filter(|&&v| v).count());
            let total = items.as_ref().map_or(0, |items| items.len());
            self.render(DONE, format!("{finished}/{total} done"));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Todo List ===\n");

    let list_view = Widget::new(Some("bindingTag0"), None, vec![]);
    let summary = Widget::new(Some("bindingTag1"), None, vec![]);
    let header = Widget::new(Some("header"), Some(10), vec![]);
    let root = Widget::new(None, Some(1), vec![header, list_view.clone(), summary.clone()]);

    let layout = BindingLayout::new(2);
    let found = map_tagged_nodes(&root, &layout)?;
    let ids: HashMap<u32, Widget> = found.by_id;
    println!("1. Discovered {} bound slots and {} id nodes", found.slots.len(), ids.len());

    let frames = Rc::new(FrameQueue::new());
    let binder = Binder::new(
        root,
        layout,
        Rc::clone(&frames),
        TodoBindings { slots: found.slots },
    );

    let items = Rc::new(ObservableVec::new());
    let done: Rc<ObservableMap<String, bool>> = Rc::new(ObservableMap::new());
    binder.update_list(ITEMS, Some(Rc::clone(&items)));
    binder.update_map(DONE, Some(Rc::clone(&done)));

    println!("\n2. Adding todos");
    items.extend(["write docs".to_string(), "review".to_string(), "ship".to_string()]);
    done.insert("write docs".to_string(), true);
    frames.run_frame();
    println!("{}\n   {}", list_view.text(), summary.text());

    println!("\n3. Reordering and finishing");
    items.move_item(2, 0);
    done.insert("ship".to_string(), true);
    done.remove(&"write docs".to_string());
    println!("   queued frame callbacks: {}", frames.pending());
    frames.run_frame();
    println!("{}\n   {}", list_view.text(), summary.text());

    println!("\n4. Unbinding the summary");
    binder.unregister_from(DONE);
    done.clear();
    println!("   rebind pending: {}", binder.has_pending_rebind());

    println!("\n✓ Todo list complete!");
    Ok(())
}
