//! Language-model seam used to phrase answers.

use anyhow::Result;
use async_trait::async_trait;
use katalog_core::Product;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Prompt that restricts the model to the products the search engine chose.
pub fn grounded_prompt(question: &str, status_message: &str, products: &[Product]) -> String {
    let mut prompt = String::from(
        "Kamu adalah asisten belanja. Jawab pertanyaan pengguna dalam bahasa Indonesia \
         hanya dengan produk di daftar berikut. Jangan mengubah harga atau menambah produk.\n",
    );
    prompt.push_str(&format!("\nPertanyaan: {question}\n"));
    prompt.push_str(&format!("Status pencarian: {status_message}\n"));

    if products.is_empty() {
        prompt.push_str("Daftar produk: (kosong)\n");
        return prompt;
    }

    prompt.push_str("Daftar produk:\n");
    for (index, product) in products.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} | merek: {} | kategori: {} | harga: {} | rating: {}\n",
            index + 1,
            product.name,
            if product.brand.is_empty() { "-" } else { product.brand.as_str() },
            product.category,
            crate::render::format_rupiah(product.price),
            product.rating(),
        ));
    }
    prompt
}
