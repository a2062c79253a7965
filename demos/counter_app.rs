//! Counter screen bound to observable state, driven by a manual frame loop

use std::cell::RefCell;
use std::rc::Rc;

use bindery::{
    Binder, BindingHooks, BindingLayout, FieldChange, FrameQueue, ObservableField, ALL_FIELDS,
};
use tracing_subscriber::EnvFilter;

const COUNT: usize = 0;
const STEP: usize = 1;

/// What the "screen" shows. Stands in for real widgets.
#[derive(Debug, Default)]
struct Screen {
    count_label: String,
    parity_label: String,
}

struct CounterBindings {
    screen: Rc<RefCell<Screen>>,
}

impl BindingHooks<&'static str> for CounterBindings {
    fn on_field_change(&self, _: &Binder<&'static str>, change: &FieldChange<'_>) -> bool {
        // The step only matters to the buttons, not to anything on screen.
        change.local_field_id == COUNT && change.field_id == ALL_FIELDS
    }

    fn rebind_dirty(&self, binder: &Binder<&'static str>) {
        let Some(count) = binder.observed::<ObservableField<i32>>(COUNT) else {
            return;
        };
        let count = count.get();
        let mut screen = self.screen.borrow_mut();
        screen.count_label = format!("Count: {count}");
        screen.parity_label = if count % 2 == 0 { "even" } else { "odd" }.to_string();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter Application ===\n");

    let frames = Rc::new(FrameQueue::new());
    let screen = Rc::new(RefCell::new(Screen::default()));
    let binder = Binder::new(
        "counter_screen",
        BindingLayout::new(2),
        Rc::clone(&frames),
        CounterBindings {
            screen: Rc::clone(&screen),
        },
    );

    let count = Rc::new(ObservableField::new(0));
    let step = Rc::new(ObservableField::new(1));
    binder.update_property(COUNT, Some(Rc::clone(&count)));
    binder.update_property(STEP, Some(Rc::clone(&step)));

    let print_state = |label: &str| {
        println!("   {label}: {:?}", screen.borrow());
    };

    println!("1. Three clicks before the next frame");
    for _ in 0..3 {
        count.update(|n| *n += step.get());
    }
    println!("   frame callbacks queued: {}", frames.pending());
    frames.run_frame();
    print_state("after frame");

    println!("\n2. Changing step size to 5 (ignored by the screen)");
    step.set(5);
    println!("   rebind pending: {}", binder.has_pending_rebind());

    println!("\n3. Incrementing with new step");
    count.update(|n| *n += step.get());
    frames.run_frame();
    print_state("after frame");

    println!("\n4. Swapping in a fresh counter");
    let fresh = Rc::new(ObservableField::new(100));
    binder.update_property(COUNT, Some(Rc::clone(&fresh)));
    count.set(-1);
    println!("   old counter still schedules: {}", binder.has_pending_rebind());
    fresh.set(101);
    binder.execute_pending_bindings();
    print_state("after immediate rebind");

    println!("\n5. Tearing the screen down");
    drop(binder);
    fresh.set(0);
    println!("   frames run: {}, still queued: {}", frames.frames_run(), frames.pending());
    frames.run_until_idle(4);

    println!("\n✓ Counter application complete!");
}
