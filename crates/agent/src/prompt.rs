use shopwise_core::domain::product::Category;

const PERSONA: &str = "You are a helpful e-commerce sales assistant. You help customers find \
products, answer questions about them and guide them through their shopping experience.";

const INSTRUCTIONS: &[&str] = &[
    "Be friendly, helpful and professional.",
    "When recommending products, mention specific product names, prices and key features.",
    "Ask clarifying questions to better understand what the customer needs.",
    "Compare products when it helps the customer decide.",
    "Guide the customer through the shopping process.",
    "If asked about products we do not carry, say so politely and suggest alternatives from our inventory.",
    "Keep responses concise but informative.",
    "Stay sales-oriented while remaining genuine.",
];

/// System instruction block with the product digest interpolated verbatim.
pub fn system_prompt(context_text: &str) -> String {
    let categories =
        Category::KNOWN.iter().map(Category::as_str).collect::<Vec<_>>().join(", ");

    let mut prompt = String::with_capacity(PERSONA.len() + context_text.len() + 1024);
    prompt.push_str(PERSONA);
    prompt.push_str("\n\nAvailable product categories: ");
    prompt.push_str(&categories);
    prompt.push_str("\n\nCurrent product context based on the customer's query:\n");
    prompt.push_str(context_text);
    prompt.push_str("\n\nInstructions:\n");
    for (index, instruction) in INSTRUCTIONS.iter().enumerate() {
        prompt.push_str(&format!("{}. {instruction}\n", index + 1));
    }
    prompt
}
