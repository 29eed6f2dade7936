use assetgate_core::Vocabulary;
use assetgate_rules::{RuleSpec, Transformer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;

fn transformer() -> Transformer {
    let entries: BTreeMap<String, RuleSpec> = [
        ("FQDN->IPAddress", RuleSpec::new().with_confidence(80)),
        ("FQDN->WHOIS", RuleSpec::new()),
        ("FQDN->ALL", RuleSpec::new().with_exclude(["RIRORG", "FQDN"])),
        ("IPAddress->Netblock", RuleSpec::new()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    Transformer::load(&entries, &Vocabulary::oam(), 50).expect("rules load")
}

fn bench_check(c: &mut Criterion) {
    let t = transformer();
    let tos = ["ipaddress", "whois", "tls", "netblock", "rirorg"];

    c.bench_function("check_transformations", |b| {
        b.iter(|| t.check(black_box("fqdn"), black_box(&tos)))
    });

    t.check("fqdn", &tos).expect("authorized");
    c.bench_function("check_transform_result", |b| {
        b.iter(|| t.check_result(black_box("FQDN"), black_box("WHOIS")))
    });
}

criterion_group!(benches, bench_check);
criterion_main!(benches);
