use clazz_engine::{definition, ClassManager, Function, Value, ValueMap};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn method(result: &'static str) -> Function {
    Function::returning(0, Value::from(result))
}

fn manager_with_chain(depth: usize) -> ClassManager {
    let manager = ClassManager::new();
    manager
        .add_class("Level0", definition! { "m0" => method("0") })
        .unwrap();
    for level in 1..depth {
        let mut data = ValueMap::new();
        data.insert("$_extends".to_string(), Value::from(format!("Level{}", level - 1)));
        data.insert(format!("m{}", level), Value::from(method("n")));
        manager.add_class(&format!("Level{}", level), data).unwrap();
    }
    manager
}

fn bench_inheritance_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("inheritance_chain");

    for depth in [1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("synthesize", depth), &depth, |b, &depth| {
            b.iter(|| {
                let manager = manager_with_chain(depth);
                let leaf = manager.get(&format!("Level{}", depth - 1)).unwrap();
                black_box(leaf.constructor().unwrap())
            });
        });
    }

    group.finish();
}

fn bench_composition(c: &mut Criterion) {
    c.bench_function("interfaces_and_traits", |b| {
        b.iter(|| {
            let manager = ClassManager::new();
            manager
                .add_interface("Greets", definition! { "hello" => Function::abstract_method(0) })
                .unwrap();
            manager
                .add_trait("Named", definition! { "name" => "x", "get_name" => method("x") })
                .unwrap();
            let person = manager
                .add_class(
                    "Person",
                    definition! {
                        "$_implements" => Value::strings(["Greets"]),
                        "$_traits" => Value::strings(["Named"]),
                        "hello" => method("hi"),
                    },
                )
                .unwrap();
            black_box(person.constructor().unwrap())
        });
    });
}

fn bench_instantiation(c: &mut Criterion) {
    let manager = manager_with_chain(8);
    let leaf = manager.get("Level7").unwrap();
    leaf.constructor().unwrap();

    c.bench_function("create_instance", |b| {
        b.iter(|| black_box(leaf.create_instance(&[]).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_inheritance_chain,
    bench_composition,
    bench_instantiation
);
criterion_main!(benches);
