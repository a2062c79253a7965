use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::rc::Rc;

use bindery::discovery::parse_tag_index;
use bindery::{Binder, BindingHooks, BindingLayout, FieldChange, FrameQueue, ObservableField};

struct Accept;

impl BindingHooks<()> for Accept {
    fn on_field_change(&self, _: &Binder<()>, _: &FieldChange<'_>) -> bool {
        true
    }

    fn rebind_dirty(&self, _: &Binder<()>) {}
}

fn binder_creation_benchmark(c: &mut Criterion) {
    let frames = Rc::new(FrameQueue::new());

    c.bench_function("binder_creation", |b| {
        b.iter(|| Binder::new((), BindingLayout::new(black_box(16)), Rc::clone(&frames), Accept));
    });
}

fn registration_swap_benchmark(c: &mut Criterion) {
    let frames = Rc::new(FrameQueue::new());
    let binder = Binder::new((), BindingLayout::new(1), Rc::clone(&frames), Accept);
    let a = Rc::new(ObservableField::new(0));
    let b_field = Rc::new(ObservableField::new(0));

    c.bench_function("registration_swap", |b| {
        let mut flip = false;
        b.iter(|| {
            let target = if flip { &a } else { &b_field };
            black_box(binder.update_property(0, Some(Rc::clone(target))));
            flip = !flip;
        });
    });
}

fn notification_burst_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("notification_burst");

    for burst in [1, 10, 100].iter() {
        let frames = Rc::new(FrameQueue::new());
        let binder = Binder::new((), BindingLayout::new(1), Rc::clone(&frames), Accept);
        let field = Rc::new(ObservableField::new(0));
        binder.update_property(0, Some(Rc::clone(&field)));

        group.bench_with_input(BenchmarkId::from_parameter(burst), burst, |b, &burst| {
            b.iter(|| {
                for i in 0..burst {
                    field.set(black_box(i));
                }
                frames.run_frame();
            });
        });
    }
    group.finish();
}

fn tag_parse_benchmark(c: &mut Criterion) {
    c.bench_function("tag_parse", |b| {
        b.iter(|| parse_tag_index(black_box("bindingTag1234")));
    });
}

criterion_group!(
    benches,
    binder_creation_benchmark,
    registration_swap_benchmark,
    notification_burst_benchmark,
    tag_parse_benchmark,
);
criterion_main!(benches);
