//! Serializer benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use figbridge_bridge::AssetUploader;
use figbridge_core::{AssetMap, DocumentNode, DocumentText, FontName, NodeType, Paint, Rgb, StyleRange};
use figbridge_serialize::{DocumentExporter, SerializeOptions, TreeSerializer};
use futures::executor::block_on;
use futures::future::{self, FutureExt, LocalBoxFuture};

struct NullUploader;

impl AssetUploader for NullUploader {
    fn request_upload<'a>(&'a self, name: &'a str, _data: String) -> LocalBoxFuture<'a, Option<String>> {
        future::ready(Some(name.to_string())).boxed_local()
    }
}

fn wide_tree(rows: usize) -> DocumentNode {
    (0..rows).fold(DocumentNode::frame("0:0", "List"), |list, i| {
        let label = DocumentText::new("Item title, subtitle")
            .with_range(StyleRange {
                start: 0,
                end: 10,
                font_size: Some(16.0),
                font_name: Some(FontName::new("Inter", "Bold")),
                font_weight: Some(700.0),
                fills: None,
            });
        let row = DocumentNode::frame(format!("1:{i}"), format!("Card {i}"))
            .with_size(343.0, 72.0)
            .with_fills(vec![Paint::solid(Rgb::WHITE)])
            .with_child(
                DocumentNode::new(format!("2:{i}"), "Icon", NodeType::Vector).with_size(24.0, 24.0),
            )
            .with_child(DocumentNode::text(format!("3:{i}"), "Label", "").with_text(label));
        list.with_child(row)
    })
}

fn serialize_wide(c: &mut Criterion) {
    let tree = wide_tree(200);
    let serializer = TreeSerializer::new(DocumentExporter::new(), NullUploader)
        .with_options(SerializeOptions::new().with_context_image(false));
    c.bench_function("serialize_wide", |b| {
        b.iter(|| {
            let mut assets = AssetMap::new();
            block_on(serializer.serialize(black_box(&tree), &mut assets))
        })
    });
}

criterion_group!(benches, serialize_wide);
criterion_main!(benches);
