use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn get_input(name: &str) -> Vec<u8> {
    std::fs::read(format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), name)).unwrap()
}

pub mod manifest {
    use divan::Bencher;
    use rads_formats::ReleaseManifest;
    use std::io::Cursor;

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher
            .with_inputs(|| super::get_input("releasemanifest"))
            .bench_refs(|data| {
                divan::black_box(ReleaseManifest::new(Cursor::new(data)).unwrap());
            });
    }

    #[divan::bench]
    fn list_files(bencher: Bencher) {
        let manifest = ReleaseManifest::new(Cursor::new(super::get_input("releasemanifest"))).unwrap();
        bencher.bench_local(move || {
            divan::black_box(manifest.list_files());
        });
    }
}

pub mod archive {
    use divan::Bencher;
    use rads_formats::{hash_path, RafArchive};
    use std::io::Cursor;

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher
            .with_inputs(|| super::get_input("Archive_1.raf"))
            .bench_refs(|data| {
                divan::black_box(RafArchive::new(Cursor::new(data)).unwrap());
            });
    }

    #[divan::bench]
    fn hash(bencher: Bencher) {
        bencher.bench(|| divan::black_box(hash_path(divan::black_box("DATA/Characters/Annie/Annie.skn"))));
    }
}
