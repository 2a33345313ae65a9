use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Article, ArticleStatus, WeChatAccount};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

pub fn articles() -> Vec<Article> {
    vec![
        Article {
            id: "1".to_string(),
            title: "How AI Is Changing the Content Creation Industry".to_string(),
            content: "With AI advancing quickly, content creation is going through an unprecedented shift. From automated writing to smart editing, AI is redefining how creators work...".to_string(),
            source: "WeChat Official Accounts".to_string(),
            source_url: "https://example.com/article1".to_string(),
            author: "Tech Observer".to_string(),
            publish_time: at(2024, 1, 15, 10, 30),
            collect_time: at(2024, 1, 16, 8, 0),
            tags: tags(&["AI", "Content Creation", "Tech"]),
            category: "Tech".to_string(),
            read_count: 5240,
            like_count: 328,
            status: ArticleStatus::Pending,
        },
        Article {
            id: "2".to_string(),
            title: "Social Media Marketing Trends for 2024".to_string(),
            content: "Social media marketing shows new trends in 2024. Short video stays hot, live commerce goes mainstream, and recommendation algorithms get sharper...".to_string(),
            source: "Zhihu".to_string(),
            source_url: "https://example.com/article2".to_string(),
            author: "Marketing Expert".to_string(),
            publish_time: at(2024, 1, 14, 15, 20),
            collect_time: at(2024, 1, 16, 9, 15),
            tags: tags(&["Marketing", "Social Media", "Trends"]),
            category: "Marketing".to_string(),
            read_count: 3180,
            like_count: 256,
            status: ArticleStatus::Rewritten,
        },
        Article {
            id: "3".to_string(),
            title: "Where Remote Work Is Heading".to_string(),
            content: "The pandemic changed how the world works, turning remote work from a stopgap into a lasting trend. Companies and employees are adapting...".to_string(),
            source: "Weibo".to_string(),
            source_url: "https://example.com/article3".to_string(),
            author: "Career Mentor".to_string(),
            publish_time: at(2024, 1, 13, 11, 45),
            collect_time: at(2024, 1, 16, 10, 30),
            tags: tags(&["Remote Work", "Career", "Future"]),
            category: "Career".to_string(),
            read_count: 4520,
            like_count: 389,
            status: ArticleStatus::Published,
        },
    ]
}

pub fn accounts() -> Vec<WeChatAccount> {
    vec![
        WeChatAccount {
            id: "1".to_string(),
            name: "Tech Frontier".to_string(),
            app_id: "wx1234567890".to_string(),
            is_connected: true,
            last_sync_at: Some(at(2024, 1, 16, 8, 0)),
        },
        WeChatAccount {
            id: "2".to_string(),
            name: "Marketing Insights".to_string(),
            app_id: "wx0987654321".to_string(),
            is_connected: false,
            last_sync_at: None,
        },
    ]
}
