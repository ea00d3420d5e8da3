//! Stress test for the shared document store.
//!
//! Covers: concurrent sessions, transform-then-replace under contention,
//! and eviction.
//!
//! Run with: cargo run --release --example stress_test

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::{Duration, Utc};
use lottiekit::{
    apply_palette, optimize, AnimationDocument, DocumentId, DocumentRecord, DocumentStore, Layer,
    LayerSelector, Rgb, ShapeNode,
};

fn main() {
    println!("========================================");
    println!(" LottieKit Store Stress Suite");
    println!("========================================\n");

    let store = Arc::new(DocumentStore::new());
    test_concurrent_users(&store, 32, 20);
    test_eviction(&store);
}

fn sample_document(layers: usize) -> AnimationDocument {
    let mut doc = AnimationDocument::new(512, 512, 30.0, 0.0, 90.0);
    for i in 0..layers {
        doc = doc.with_layer(
            Layer::shape_layer(
                format!("layer-{}", i),
                vec![
                    ShapeNode::fill(Rgb::new(0.314159, 0.271828, 0.161803)),
                    ShapeNode::group(vec![ShapeNode::fill(Rgb::BLACK)]),
                ],
            )
            .with_hidden(i % 5 == 4),
        );
    }
    doc
}

// -----------------------------------------------------------------------------
// 1. Concurrent users, each with its own session
// -----------------------------------------------------------------------------
fn test_concurrent_users(store: &Arc<DocumentStore>, users: usize, docs_per_user: usize) {
    println!(
        "Test: {} concurrent users, {} documents each, palette + optimize per document",
        users, docs_per_user
    );
    let start = Instant::now();
    let palette = [Rgb::from_hex("#E63946"), Rgb::from_hex("#457B9D")];

    let handles: Vec<_> = (0..users)
        .map(|_| {
            let store = Arc::clone(store);
            thread::spawn(move || {
                let session = store.create_session();
                let mut saved = 0usize;
                for d in 0..docs_per_user {
                    let id = DocumentId::new(format!("doc-{}", d));
                    store.put_document(
                        &session,
                        DocumentRecord::new(id.clone(), "stress.json", sample_document(25)),
                    );
                    store
                        .transform(&session, &id, |doc| {
                            Ok((apply_palette(doc, &palette, &LayerSelector::All)?, ()))
                        })
                        .unwrap();
                    let stats = store
                        .transform(&session, &id, |doc| {
                            let outcome = optimize(doc)?;
                            Ok((outcome.document, outcome.stats))
                        })
                        .unwrap()
                        .unwrap();
                    saved += stats.original_size.saturating_sub(stats.optimized_size);
                }
                (session, saved)
            })
        })
        .collect();

    let mut total_saved = 0usize;
    for handle in handles {
        let (session, saved) = handle.join().unwrap();
        assert_eq!(store.list_documents(&session).len(), docs_per_user);
        total_saved += saved;
    }

    let duration = start.elapsed();
    let ops = users * docs_per_user * 3;
    let stats = store.stats();
    println!("   Sessions:         {}", stats.sessions);
    println!("   Documents:        {}", stats.documents);
    println!("   Bytes saved:      {}", total_saved);
    println!("   Total Time:       {:?}", duration);
    println!(
        "   Throughput:       {:.0} ops/sec\n",
        ops as f64 / duration.as_secs_f64()
    );
}

// -----------------------------------------------------------------------------
// 2. Eviction sweep over a populated store
// -----------------------------------------------------------------------------
fn test_eviction(store: &Arc<DocumentStore>) {
    println!("Test: eviction sweep");
    let before = store.session_count();
    let start = Instant::now();
    let evicted = store.evict_expired_at(Utc::now() + Duration::hours(25));
    println!("   Sessions before:  {}", before);
    println!("   Evicted:          {}", evicted);
    println!("   Sweep Time:       {:?}", start.elapsed());
    assert_eq!(store.session_count(), 0);
}
