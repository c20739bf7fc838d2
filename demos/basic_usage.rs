use stratum::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut list = SkipList::new(3).expect("max level is positive");

    for key in [3, 6, 7, 9, 12] {
        list.insert(key, key * 100);
    }
    tracing::info!("after inserts, level {}:\n{}", list.level(), list);

    tracing::info!("search 9: {:?}", list.get(&9));

    tracing::info!("delete 6: {:?}", list.remove(&6));
    tracing::info!("search 6: {:?}", list.get(&6));

    println!("{list}");
}
