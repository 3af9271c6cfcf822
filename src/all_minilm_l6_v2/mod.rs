pub const MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const LOCAL_MODEL_DIR: &str = "all-MiniLM-L6-v2"; // optional offline copy, same layout as the HF repo
pub const VECTOR_SIZE: u64 = 384; // all-MiniLM-L6-v2 embedding Size: 384 dimensions
pub const EMBED_BATCH_SIZE: usize = 32;
