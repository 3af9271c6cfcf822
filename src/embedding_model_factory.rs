use std::path::{Path, PathBuf};

use fastembed::{
    read_file_to_bytes, EmbeddingModel, InitOptions, InitOptionsUserDefined, Pooling,
    TextEmbedding, TokenizerFiles, UserDefinedEmbeddingModel,
};
use tracing::info;

use crate::all_minilm_l6_v2::LOCAL_MODEL_DIR;
use crate::error::{Error, Result};

/// Prefer an offline copy of all-MiniLM-L6-v2 next to the binary; otherwise let
/// fastembed fetch it into its cache.
pub fn get_model() -> Result<TextEmbedding> {
    let base_path = PathBuf::from(LOCAL_MODEL_DIR);
    if base_path.join("onnx").join("model.onnx").is_file() {
        info!("Loading embedding model from {}", base_path.display());
        return load_user_defined(&base_path);
    }

    info!("Loading embedding model {:?}", EmbeddingModel::AllMiniLML6V2);
    TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
        .map_err(|e| Error::Embedding(format!("Failed to initialize model: {}", e)))
}

fn load_user_defined(base_path: &Path) -> Result<TextEmbedding> {
    let read = |path: PathBuf| {
        read_file_to_bytes(&path)
            .map_err(|e| Error::Embedding(format!("{}: {}", path.display(), e)))
    };

    let onnx_bytes = read(base_path.join("onnx").join("model.onnx"))?;
    let tokenizer_files = TokenizerFiles {
        tokenizer_file: read(base_path.join("tokenizer.json"))?,
        config_file: read(base_path.join("config.json"))?,
        special_tokens_map_file: read(base_path.join("special_tokens_map.json"))?,
        tokenizer_config_file: read(base_path.join("tokenizer_config.json"))?,
    };

    let user_model =
        UserDefinedEmbeddingModel::new(onnx_bytes, tokenizer_files).with_pooling(Pooling::Mean);

    TextEmbedding::try_new_from_user_defined(user_model, InitOptionsUserDefined::default())
        .map_err(|e| Error::Embedding(format!("Failed to initialize model: {}", e)))
}
