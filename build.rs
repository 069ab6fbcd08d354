use std::fs;
use std::io;

const PROTO_DIR: &str = "./protos/";
const OUT_DIR: &str = "./generated/";

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=protos/raft.proto");

    fs::create_dir_all(OUT_DIR)?;
    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .out_dir(OUT_DIR)
        .compile(&["./protos/raft.proto"], &[PROTO_DIR])
}
