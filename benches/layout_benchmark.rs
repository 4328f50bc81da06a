//! Benchmarks for text layout and vector resize.
//!
//! Run with: cargo bench

use a5kit::{
    transform_document, ColumnLayout, PageSize, PdftoppmRasterizer, SourcePdf, Strategy,
    TextLayoutOptions, TextStyle, TransformMode, TransformOptions,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Creates an A4 PDF with the given number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for i in 0..page_count {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(11)]),
            Operation::new("TL", vec![Object::Integer(14)]),
            Operation::new("Td", vec![Object::Integer(72), Object::Integer(770)]),
        ];
        for line in 0..48 {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!(
                    "Page {} line {} - benchmark content for a5kit.",
                    i + 1,
                    line + 1
                ))],
            ));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap_or_default(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PageSize::A4.width),
                Object::Real(PageSize::A4.height),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count as i64),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("benchmark PDF serializes");
    buf
}

/// Creates `paragraphs` paragraphs of filler text.
fn create_test_text(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "Paragraph {} opens here. Reformatting for small paper means shorter lines, \
                 more breaks and more pages, and the typesetter has to keep up with all of it.",
                i + 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bench_text_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_layout");

    for paragraphs in [10, 100, 500] {
        let text = create_test_text(paragraphs);

        let single = TextLayoutOptions::new()
            .with_title("Benchmark")
            .with_text_style(TextStyle::Justified);
        group.bench_with_input(BenchmarkId::new("single", paragraphs), &text, |b, text| {
            b.iter(|| a5kit::text_to_pdf(black_box(text), &single))
        });

        let double = single.clone().with_layout(ColumnLayout::Double);
        group.bench_with_input(BenchmarkId::new("double", paragraphs), &text, |b, text| {
            b.iter(|| a5kit::text_to_pdf(black_box(text), &double))
        });
    }

    group.finish();
}

fn bench_vector_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_resize");
    // Never consulted by the vector strategy.
    let rasterizer = PdftoppmRasterizer::new();
    let options = TransformOptions::new().with_strategy(Strategy::VectorMerge);

    for pages in [1, 10, 50] {
        let data = create_test_pdf(pages);
        let source = match SourcePdf::from_bytes(data) {
            Ok(source) => source,
            Err(e) => panic!("benchmark PDF does not load: {}", e),
        };

        group.bench_with_input(BenchmarkId::new("resize", pages), &source, |b, source| {
            b.iter(|| {
                transform_document(
                    black_box(source),
                    TransformMode::Resize,
                    &options,
                    &rasterizer,
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("split", pages), &source, |b, source| {
            b.iter(|| {
                transform_document(
                    black_box(source),
                    TransformMode::Split,
                    &options,
                    &rasterizer,
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_text_layout, bench_vector_resize);
criterion_main!(benches);
