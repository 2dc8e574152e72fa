use std::collections::hash_map::RandomState;

use clap::Parser;
use probe_table::Error;
use probe_table::HashMap;
use probe_table::PowerSet;
use probe_table::Probing;

/// Count word frequencies in a fixed-capacity map and compare the vocabulary
/// of two halves of the input.
#[derive(Parser, Debug)]
struct Args {
    /// Number of slots in the frequency map.
    #[arg(short = 'c', long = "capacity", default_value_t = 64)]
    capacity: usize,

    /// Distance between successive probe candidates.
    #[arg(short = 's', long = "stride", default_value_t = 1)]
    stride: usize,

    /// Words to index. A short sample text is used when none are given.
    words: Vec<String>,
}

const SAMPLE: &str = "the quick brown fox jumps over the lazy dog while the \
                      lazy cat watches the quick fox run over the hill and \
                      the dog sleeps under the old oak tree";

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let words: Vec<String> = if args.words.is_empty() {
        SAMPLE.split_whitespace().map(str::to_owned).collect()
    } else {
        args.words
    };

    let mut counts =
        HashMap::with_capacity_and_probing(args.capacity, Probing::Linear {
            stride: args.stride,
        })?;

    println!(
        "Indexing {} words into a map with {} slots",
        words.len(),
        counts.capacity()
    );

    let mut rejected = 0usize;
    for word in &words {
        match counts.get_mut(word) {
            Ok(count) => *count += 1,
            Err(_) => match counts.insert(word, 1usize) {
                Ok(_) => {}
                Err(e) => {
                    rejected += 1;
                    println!("  could not index {word:?}: {e}");
                }
            },
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.iter().map(|(w, &c)| (w, c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("Distinct words: {} ({rejected} rejected)", counts.len());
    for (word, count) in ranked.iter().take(10) {
        println!("{count:>6}  {word}");
    }

    counts.probe_histogram().print();
    counts.debug_stats().print();

    // Vocabulary of each half, bounded by the map capacity.
    let (first, second) = words.split_at(words.len() / 2);
    let mut left: PowerSet<&str, RandomState> = PowerSet::with_capacity(args.capacity)?;
    let mut right: PowerSet<&str, RandomState> = PowerSet::with_capacity(args.capacity)?;
    let mut dropped = 0usize;
    for (set, half) in [(&mut left, first), (&mut right, second)] {
        for word in half {
            if let Err(e) = set.insert(word.as_str()) {
                dropped += 1;
                println!("  vocabulary set dropped {word:?}: {e}");
            }
        }
    }

    println!("=== Vocabulary Comparison ===");
    println!("First half: {} words", left.len());
    println!("Second half: {} words", right.len());
    println!("Dropped at capacity: {dropped}");
    println!("Shared: {}", left.count_same(&right));
    println!("In only one half: {}", left.count_different(&right));

    let mut combined = left.clone();
    match combined.union(&right) {
        Ok(()) => println!("Union: {} words", combined.len()),
        Err(e) => println!("Union rejected: {e}"),
    }

    let mut shared = left.clone();
    shared.intersect(&right);
    let mut shared: Vec<&str> = shared.iter().copied().collect();
    shared.sort_unstable();
    println!("Shared words: {}", shared.join(", "));

    Ok(())
}
