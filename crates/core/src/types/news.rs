//! News module content: weather, commodity quotes and articles.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::NewsPostId;
use super::money::{optional_decimal, optional_f64};

/// Commodity quote (cotação) shown in the news ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    #[serde(alias = "produto", alias = "nome")]
    pub name: String,
    #[serde(default, alias = "valor", alias = "preco", deserialize_with = "optional_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, alias = "unidade")]
    pub unit: Option<String>,
    /// Daily variation in percent.
    #[serde(default, alias = "variacao", deserialize_with = "optional_f64")]
    pub variation: Option<f64>,
    #[serde(default, alias = "praca", alias = "fonte")]
    pub source: Option<String>,
    #[serde(default, alias = "data", alias = "atualizado_em")]
    pub updated_at: Option<String>,
}

/// Weather conditions (clima) for one city and day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherItem {
    #[serde(alias = "cidade")]
    pub city: String,
    #[serde(default, alias = "temperatura", alias = "temp", deserialize_with = "optional_f64")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "temp_min", alias = "minima", deserialize_with = "optional_f64")]
    pub min_temperature: Option<f64>,
    #[serde(default, alias = "temp_max", alias = "maxima", deserialize_with = "optional_f64")]
    pub max_temperature: Option<f64>,
    #[serde(default, alias = "umidade", deserialize_with = "optional_f64")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "condicao", alias = "descricao")]
    pub condition: Option<String>,
    #[serde(default, alias = "icone")]
    pub icon: Option<String>,
    #[serde(default, alias = "data")]
    pub date: Option<String>,
}

/// A published article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: NewsPostId,
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "resumo", alias = "excerpt")]
    pub summary: Option<String>,
    #[serde(default, alias = "conteudo", alias = "body")]
    pub content: Option<String>,
    #[serde(default, alias = "imagem", alias = "image")]
    pub image_url: Option<String>,
    #[serde(default, alias = "autor")]
    pub author: Option<String>,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    #[serde(default, alias = "publicado_em", alias = "created_at")]
    pub published_at: Option<String>,
}

impl NewsPost {
    /// Route key for this post: its slug, or its id when no slug is set.
    #[must_use]
    pub fn route_key(&self) -> String {
        self.slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| self.id.to_string(), ToString::to_string)
    }

    /// Summary for cards: the explicit summary, or the first `max_chars`
    /// characters of the content.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        if let Some(summary) = self.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            return summary.trim().to_string();
        }
        let content = self.content.as_deref().unwrap_or("").trim();
        if content.chars().count() <= max_chars {
            return content.to_string();
        }
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_quote_from_backend_shape() {
        let q: QuoteItem = serde_json::from_value(json!({
            "produto": "Soja", "valor": "135,50", "unidade": "sc 60kg", "variacao": "-0,8%"
        }))
        .unwrap();
        assert_eq!(q.name, "Soja");
        assert_eq!(q.price, Some(Decimal::new(13550, 2)));
        assert_eq!(q.variation, Some(-0.8));
    }

    #[test]
    fn test_weather_from_backend_shape() {
        let w: WeatherItem = serde_json::from_value(json!({
            "cidade": "Cascavel", "temperatura": 24.5, "umidade": "60", "condicao": "Nublado"
        }))
        .unwrap();
        assert_eq!(w.city, "Cascavel");
        assert_eq!(w.temperature, Some(24.5));
        assert_eq!(w.humidity, Some(60.0));
        assert_eq!(w.min_temperature, None);
    }

    #[test]
    fn test_post_route_key_and_excerpt() {
        let post: NewsPost = serde_json::from_value(json!({
            "id": 5, "titulo": "Safra recorde", "conteudo": "Produção de grãos cresce no estado"
        }))
        .unwrap();
        assert_eq!(post.route_key(), "5");
        assert_eq!(post.excerpt(100), "Produção de grãos cresce no estado");
        assert_eq!(post.excerpt(10), "Produção d…");
    }
}
