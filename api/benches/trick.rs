use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use spades_api::{Card, Seat, Trick};

const CARDS: [Card; 4] = [
    Card::SixDiamonds,
    Card::QueenDiamonds,
    Card::NineSpades,
    Card::TenClubs,
];

fn full() -> Trick {
    let mut trick = Trick::new();
    for &card in &CARDS {
        trick = trick.push(card);
    }
    trick
}

pub fn push(c: &mut Criterion) {
    c.bench_function("push", |b| {
        b.iter_batched(
            Trick::new,
            |mut trick| {
                for &card in &CARDS {
                    trick = trick.push(card);
                }
                trick
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn suit(c: &mut Criterion) {
    c.bench_with_input(
        BenchmarkId::new("suit", ""),
        &Trick::new().push(Card::FiveDiamonds),
        |b, trick| {
            b.iter(|| trick.suit());
        },
    );
}

pub fn winning_seat(c: &mut Criterion) {
    c.bench_with_input(BenchmarkId::new("winning_seat", ""), &full(), |b, trick| {
        b.iter(|| trick.winning_seat(Seat::North));
    });
}

pub fn cards(c: &mut Criterion) {
    c.bench_with_input(BenchmarkId::new("cards", ""), &full(), |b, trick| {
        b.iter(|| trick.cards());
    });
}

criterion_group!(benches, push, suit, winning_seat, cards);
criterion_main!(benches);
