use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ptype::config::{Config, MAX_ERR, MIN_MAIN_WIDTH, Mode};
use ptype::engine::Viewport;
use ptype::engine::layout::fix_all_lines;
use ptype::engine::tracker::{process_backspace, process_char};
use ptype::generator::{self, dictionary};
use ptype::session::Session;
use ptype::session::text::TypeText;

fn make_words(count: usize) -> Vec<String> {
    let words = dictionary::builtin_words();
    (0..count).map(|i| words[(i * 7) % words.len()].clone()).collect()
}

fn bench_layout(c: &mut Criterion) {
    let words = make_words(3000);

    c.bench_function("from_words (3000 words)", |b| {
        b.iter(|| TypeText::from_words(black_box(words.clone()), 55))
    });

    let mut tt = TypeText::from_words(words, 80);
    c.bench_function("fix_all_lines resize 80 -> 40 (3000 words)", |b| {
        b.iter(|| {
            fix_all_lines(&mut tt, 40);
            fix_all_lines(&mut tt, 80);
        })
    });
}

fn bench_overtyping(c: &mut Criterion) {
    let words = make_words(500);

    // Every word overtyped to the cap and then corrected, forcing a reflow
    // cascade on both the push and the pull side.
    c.bench_function("overtype and correct (500 words)", |b| {
        b.iter(|| {
            let mut tt = TypeText::from_words(words.clone(), MIN_MAIN_WIDTH);
            while !tt.is_complete() {
                let target = tt.text[tt.current_word].clone();
                for ch in target.chars() {
                    process_char(&mut tt, ch, false, MIN_MAIN_WIDTH);
                }
                for _ in 0..MAX_ERR {
                    process_char(&mut tt, 'z', false, MIN_MAIN_WIDTH);
                }
                for _ in 0..MAX_ERR {
                    process_backspace(&mut tt, MIN_MAIN_WIDTH);
                }
                process_char(&mut tt, ' ', false, MIN_MAIN_WIDTH);
            }
            tt
        })
    });
}

fn bench_generate(c: &mut Criterion) {
    let viewport = Viewport::new(55, 5).expect("valid viewport");
    let config = Config {
        word_count: 1000,
        punctuation: 50,
        ..Config::default()
    };
    let mut session = Session::with_seed(config, dictionary::builtin_words(), Vec::new(), 42)
        .expect("valid config");

    c.bench_function("generate normal (1000 words, 50% punctuation)", |b| {
        b.iter(|| generator::generate(&mut session, &viewport))
    });

    let mut timed = session.config.clone();
    timed.mode = Mode::Timed;
    session.apply_config(timed).expect("valid config");
    c.bench_function("generate timed", |b| {
        b.iter(|| generator::generate(&mut session, &viewport))
    });
}

criterion_group!(benches, bench_layout, bench_overtyping, bench_generate);
criterion_main!(benches);
