//! Trap dispatch benchmarks
//!
//! Compares a direct `get` trap with the derived path through
//! `getPropertyDescriptor`, and a fixed proxy with an ordinary object.

use criterion::{Criterion, criterion_group, criterion_main};
use harmony_vm::{PropertyDescriptor, PropertyKey, VmContext, VmRuntime, Value};
use std::hint::black_box;

fn handler(ctx: &VmContext, traps: Vec<(&str, Value)>) -> Value {
    let obj = ctx.new_object();
    for (name, trap) in traps {
        obj.define_property(PropertyKey::string(name), PropertyDescriptor::data(trap));
    }
    Value::object(obj)
}

fn value_descriptor(ctx: &VmContext, value: Value) -> Value {
    let desc = ctx.new_object();
    desc.define_property("value".into(), PropertyDescriptor::data(value));
    desc.define_property("enumerable".into(), PropertyDescriptor::data(Value::boolean(true)));
    Value::object(desc)
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("proxy_get");
    let key = PropertyKey::string("x");

    let mut ctx = VmRuntime::new().create_context();
    let get = ctx.native_function("get", 2, |_, _, _| Ok(Value::number(1.0)));
    let h = handler(&ctx, vec![("get", get)]);
    let p = ctx.create_object_proxy(h, Value::null()).unwrap();
    group.bench_function("get_trap", |b| {
        b.iter(|| black_box(ctx.get(&p, &key).unwrap()))
    });

    let mut ctx = VmRuntime::new().create_context();
    let describe = ctx.native_function("getPropertyDescriptor", 1, |_, _, ctx| {
        Ok(value_descriptor(ctx, Value::number(1.0)))
    });
    let h = handler(&ctx, vec![("getPropertyDescriptor", describe)]);
    let p = ctx.create_object_proxy(h, Value::null()).unwrap();
    group.bench_function("derived_get", |b| {
        b.iter(|| black_box(ctx.get(&p, &key).unwrap()))
    });

    group.finish();
}

fn bench_keys(c: &mut Criterion) {
    let mut ctx = VmRuntime::new().create_context();
    let names: Vec<Value> = (0..32).map(|i| Value::from(format!("k{i}"))).collect();
    let list = ctx.create_array(names);
    let own_names = ctx.native_function("getOwnPropertyNames", 0, move |_, _, _| Ok(list.clone()));
    let describe = ctx.native_function("getOwnPropertyDescriptor", 1, |_, _, ctx| {
        Ok(value_descriptor(ctx, Value::undefined()))
    });
    let h = handler(
        &ctx,
        vec![
            ("getOwnPropertyNames", own_names),
            ("getOwnPropertyDescriptor", describe),
        ],
    );
    let p = ctx.create_object_proxy(h, Value::null()).unwrap();
    let obj = p.as_object().unwrap().clone();

    c.bench_function("derived_keys_32", |b| {
        b.iter(|| black_box(ctx.own_keys(&obj).unwrap()))
    });
}

fn bench_fixed_vs_ordinary(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_proxy");
    let key = PropertyKey::string("x");

    let mut ctx = VmRuntime::new().create_context();
    let fix = ctx.native_function("fix", 0, |_, _, ctx| {
        let map = ctx.new_object();
        map.define_property(
            "x".into(),
            PropertyDescriptor::data(value_descriptor(ctx, Value::number(1.0))),
        );
        Ok(Value::object(map))
    });
    let h = handler(&ctx, vec![("fix", fix)]);
    let p = ctx.create_object_proxy(h, Value::null()).unwrap();
    ctx.freeze(p.as_object().unwrap()).unwrap();
    group.bench_function("fixed_get", |b| {
        b.iter(|| black_box(ctx.get(&p, &key).unwrap()))
    });

    let plain = Value::object(ctx.new_object());
    ctx.assign(&plain, &key, Value::number(1.0)).unwrap();
    group.bench_function("ordinary_get", |b| {
        b.iter(|| black_box(ctx.get(&plain, &key).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_get, bench_keys, bench_fixed_vs_ordinary);
criterion_main!(benches);
