use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_editor::{Document, Operation, Section, Transaction};

fn seeded_document(sections: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..sections {
        doc.insert_section(Section::new(format!("section-{i}"))).unwrap();
    }
    doc
}

fn typing_transaction(component: &str, index: usize) -> Transaction {
    Transaction::single(Operation::insert_chars(component, index, "x"))
}

fn transact_typing(c: &mut Criterion) {
    c.bench_function("transact_typing_100", |b| {
        b.iter(|| {
            let mut doc = seeded_document(10);
            for i in 0..100 {
                doc.transact(black_box(typing_transaction("section-5-0", i)))
                    .unwrap();
            }
            doc
        })
    });
}

fn undo_redo_cycle(c: &mut Criterion) {
    let mut doc = seeded_document(10);
    for i in 0..100 {
        doc.transact(typing_transaction("section-5-0", i)).unwrap();
    }

    c.bench_function("undo_redo_cycle_100", |b| {
        b.iter(|| {
            while doc.undo().unwrap().is_some() {}
            while doc.redo().unwrap().is_some() {}
        })
    });
}

fn structural_transaction(c: &mut Criterion) {
    c.bench_function("insert_delete_component", |b| {
        let mut doc = seeded_document(50);
        b.iter(|| {
            doc.transact(Transaction::new(vec![
                Operation::insert_component("section-25", "bench", "Paragraph", 0),
                Operation::insert_chars("bench", 0, "hello"),
            ]))
            .unwrap();
            doc.undo().unwrap();
        })
    });
}

criterion_group!(benches, transact_typing, undo_redo_cycle, structural_transaction);
criterion_main!(benches);
