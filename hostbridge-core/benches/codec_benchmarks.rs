use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hostbridge_core::{
    bean, encode, ApiGroup, ApiRequest, Bean, Call, CallMode, Capability, Correlator,
    MethodDescriptor, Param, RecordingSink, Result, Returns, Router, ScriptValue, WebSinkAdapter,
};
use std::hint::black_box;
use std::sync::Arc;

bean! {
    pub struct Entry as "Entry" {
        key: String => "key",
        value: String => "value",
        size: i64 => "size",
        tags: Vec<String> => "tags",
    }
}

fn sample(i: usize) -> Entry {
    Entry {
        key: Some(format!("key-{i}")),
        value: Some("line one\nline \"two\"".to_string()),
        size: Some(i as i64),
        tags: Some(vec!["a".to_string(), "b".to_string()]),
    }
}

fn bench_bean_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("bean_codec");

    for size in [1usize, 10, 100].iter() {
        let entries: Vec<Entry> = (0..*size).map(sample).collect();
        let json = hostbridge_core::bean::to_json(&entries);

        group.bench_with_input(BenchmarkId::new("encode", size), &entries, |b, entries| {
            b.iter(|| black_box(hostbridge_core::bean::to_json(entries)))
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &json, |b, json| {
            b.iter(|| black_box(hostbridge_core::bean::from_json::<Vec<Entry>>(json)))
        });

        group.bench_with_input(BenchmarkId::new("script", size), &entries, |b, entries| {
            b.iter(|| black_box(entries.to_script("Adaptive")))
        });
    }

    group.finish();
}

trait Store: Send + Sync {
    fn get(&self, key: String) -> Option<Entry>;
}

struct Fixed;

impl Store for Fixed {
    fn get(&self, key: String) -> Option<Entry> {
        Some(Entry {
            key: Some(key),
            ..sample(1)
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum StoreOp {
    Get,
}

struct StoreBridge;

impl Capability for StoreBridge {
    type Delegate = dyn Store;
    type Op = StoreOp;

    const BRIDGE: &'static str = "StoreBridge";
    const INTERFACE: &'static str = "IStore";
    const GROUP: ApiGroup = ApiGroup::Data;
    const METHODS: &'static [MethodDescriptor<StoreOp>] = &[MethodDescriptor {
        name: "get",
        op: StoreOp::Get,
        params: &[Param::new("key", "string")],
        mode: CallMode::Sync(Returns::Value("Entry")),
    }];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, StoreOp>) -> Result<Option<String>> {
        match call.op() {
            StoreOp::Get => Ok(encode(delegate.get(call.string(0)?))),
        }
    }
}

fn bench_router_dispatch(c: &mut Criterion) {
    let sink = Arc::new(RecordingSink::new());
    let correlator = Arc::new(Correlator::new(WebSinkAdapter::new(sink)));
    let router = Router::<StoreBridge>::new(correlator).with_delegate(Arc::new(Fixed));

    let hit = ApiRequest::new("get").with_param(r#""key-1""#);
    let miss = ApiRequest::new("put");

    c.bench_function("router_dispatch_hit", |b| {
        b.iter(|| black_box(router.invoke(black_box(&hit))))
    });
    c.bench_function("router_dispatch_unknown_method", |b| {
        b.iter(|| black_box(router.invoke(black_box(&miss))))
    });
    c.bench_function("bean_to_json_single", |b| {
        let entry = sample(7);
        b.iter(|| black_box(entry.to_json()))
    });
}

criterion_group!(benches, bench_bean_codec, bench_router_dispatch);
criterion_main!(benches);
