//! Topic words for rounds and generated game names.

use rand::seq::IndexedRandom;
use rand::Rng;

pub const TOPIC_WORDS: [&str; 20] = [
    "Neuron",
    "Tensor",
    "Algorithm",
    "Model",
    "Prompt",
    "Dataset",
    "Inference",
    "Gradient",
    "Epoch",
    "Vision",
    "Agent",
    "Transformer",
    "Embedding",
    "Optimizer",
    "Latent",
    "Classifier",
    "Generator",
    "Reinforce",
    "Token",
    "Sequence",
];

pub fn random_topic_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    TOPIC_WORDS.choose(rng).copied().unwrap_or(TOPIC_WORDS[0]).to_string()
}

/// Uniformly chosen topic word.
pub fn random_topic() -> String {
    random_topic_with(&mut rand::rng())
}

/// Two topic words, e.g. "Latent Gradient".
pub fn random_game_name() -> String {
    let mut rng = rand::rng();
    format!("{} {}", random_topic_with(&mut rng), random_topic_with(&mut rng))
}
