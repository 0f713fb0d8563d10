use petworld_core::domain::product::Product;

pub const WRITER_INSTRUCTIONS: &str = "\
Jesteś ekspertem PetWorld - sklepu ze zwierzętami.
Pomagasz klientom wybierać produkty dla ich pupili.

ZASADY:
- Odpowiadaj ZAWSZE po polsku
- Bądź profesjonalny i pomocny
- ZAWSZE polecaj konkretne produkty z nazwą i ceną
- Polecaj wyłącznie produkty z listy dostępnych produktów
- Jeśli klient pyta o konkretną kategorię, polecaj produkty z tej kategorii
- Uzasadnij swoje rekomendacje";

pub const CRITIC_INSTRUCTIONS: &str = "\
Jesteś krytycznym recenzentem odpowiedzi eksperta PetWorld.

OCEŃ ODPOWIEDŹ według kryteriów:
1. Czy zawiera konkretne produkty z nazwami i cenami?
2. Czy odpowiada na pytanie klienta?
3. Czy jest profesjonalna i pomocna?
4. Czy rekomendacje są uzasadnione?

ZWRÓĆ TYLKO I WYŁĄCZNIE JSON w formacie:
{\"approved\": true, \"feedback\": \"\"}

LUB jeśli odpowiedź nie spełnia kryteriów:
{\"approved\": false, \"feedback\": \"konkretne uwagi do poprawy\"}

NIE dodawaj żadnego tekstu poza JSON!";

const PRODUCTS_HEADER: &str = "=== DOSTĘPNE PRODUKTY ===";
const QUESTION_HEADER: &str = "=== PYTANIE KLIENTA ===";
const PREVIOUS_ANSWER_HEADER: &str = "=== POPRZEDNIA ODPOWIEDŹ ===";
const FEEDBACK_HEADER: &str = "=== UWAGI DO POPRAWY ===";
const ANSWER_UNDER_REVIEW_HEADER: &str = "=== ODPOWIEDŹ DO OCENY ===";

/// The previous round's candidate and the critic's notes on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorRound {
    pub answer: String,
    pub feedback: String,
}

/// Renders the catalog one product per line, in the order given.
pub fn format_product_context(products: &[Product]) -> String {
    products
        .iter()
        .map(|product| {
            format!(
                "• {} ({}) - {} zł - {}",
                product.name,
                product.category,
                product.display_price(),
                product.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn writer_prompt(question: &str, product_context: &str, prior: Option<&PriorRound>) -> String {
    let mut prompt = String::new();
    prompt.push_str(PRODUCTS_HEADER);
    prompt.push('\n');
    prompt.push_str(product_context);
    prompt.push_str("\n\n");
    prompt.push_str(QUESTION_HEADER);
    prompt.push('\n');
    prompt.push_str(question);
    prompt.push('\n');

    if let Some(prior) = prior {
        prompt.push('\n');
        prompt.push_str(PREVIOUS_ANSWER_HEADER);
        prompt.push('\n');
        prompt.push_str(&prior.answer);
        prompt.push('\n');

        if prior.feedback.trim().is_empty() {
            prompt.push_str("\nPopraw swoją poprzednią odpowiedź.\n");
        } else {
            prompt.push('\n');
            prompt.push_str(FEEDBACK_HEADER);
            prompt.push('\n');
            prompt.push_str(&prior.feedback);
            prompt.push_str("\n\nPopraw swoją poprzednią odpowiedź uwzględniając powyższe uwagi.\n");
        }
    }

    prompt
}

/// The critic sees only the question and the candidate, never the catalog.
pub fn critic_prompt(question: &str, answer: &str) -> String {
    format!(
        "{QUESTION_HEADER}\n{question}\n\n{ANSWER_UNDER_REVIEW_HEADER}\n{answer}\n\nOceń powyższą odpowiedź i zwróć JSON.\n"
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use petworld_core::domain::product::{Product, ProductId};

    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: ProductId(2),
                name: "Whiskas Adult Kurczak 7kg".to_string(),
                category: "Karma dla kotów".to_string(),
                price: Decimal::new(12900, 2),
                description: "Sucha karma dla dorosłych kotów z kurczakiem".to_string(),
            },
            Product {
                id: ProductId(1),
                name: "Tetra AquaSafe 500ml".to_string(),
                category: "Akwarystyka".to_string(),
                price: Decimal::new(4550, 2),
                description: "Uzdatniacz wody".to_string(),
            },
        ]
    }

    #[test]
    fn product_context_keeps_input_order_and_renders_every_field() {
        let context = format_product_context(&catalog());

        assert_eq!(
            context,
            "• Whiskas Adult Kurczak 7kg (Karma dla kotów) - 129 zł - Sucha karma dla dorosłych kotów z kurczakiem\n\
             • Tetra AquaSafe 500ml (Akwarystyka) - 45.5 zł - Uzdatniacz wody"
        );
    }

    #[test]
    fn product_context_is_deterministic() {
        assert_eq!(format_product_context(&catalog()), format_product_context(&catalog()));
        assert_eq!(format_product_context(&[]), "");
    }

    #[test]
    fn first_round_prompt_has_no_feedback_framing() {
        let prompt = writer_prompt("Co polecasz dla kota?", "• item", None);

        assert!(prompt.contains(PRODUCTS_HEADER));
        assert!(prompt.contains("Co polecasz dla kota?"));
        assert!(!prompt.contains(FEEDBACK_HEADER));
        assert!(!prompt.contains(PREVIOUS_ANSWER_HEADER));
    }

    #[test]
    fn later_round_prompt_carries_previous_answer_and_feedback_verbatim() {
        let prior = PriorRound {
            answer: "Polecam Whiskas.".to_string(),
            feedback: "too short".to_string(),
        };
        let prompt = writer_prompt("Co polecasz dla kota?", "• item", Some(&prior));

        assert!(prompt.contains("Polecam Whiskas."));
        assert!(prompt.contains(FEEDBACK_HEADER));
        assert!(prompt.contains("too short"));
    }

    #[test]
    fn empty_feedback_omits_feedback_section() {
        let prior = PriorRound { answer: "Polecam Whiskas.".to_string(), feedback: String::new() };
        let prompt = writer_prompt("q", "• item", Some(&prior));

        assert!(prompt.contains(PREVIOUS_ANSWER_HEADER));
        assert!(!prompt.contains(FEEDBACK_HEADER));
    }

    #[test]
    fn critic_prompt_excludes_catalog() {
        let prompt = critic_prompt("Co polecasz dla kota?", "Polecam Whiskas za 129 zł.");

        assert!(prompt.contains("Co polecasz dla kota?"));
        assert!(prompt.contains("Polecam Whiskas za 129 zł."));
        assert!(!prompt.contains(PRODUCTS_HEADER));
    }
}
