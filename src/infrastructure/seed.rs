use crate::models::{book, member};
use sea_orm::*;

struct SeedBook {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    publisher: &'static str,
    year: i32,
    category: &'static str,
    copies: i32,
}

const BOOKS: [SeedBook; 4] = [
    SeedBook {
        title: "Dom Casmurro",
        author: "Machado de Assis",
        isbn: "9788535910663",
        publisher: "Penguin-Companhia",
        year: 1899,
        category: "Romance",
        copies: 3,
    },
    SeedBook {
        title: "Vidas Secas",
        author: "Graciliano Ramos",
        isbn: "9788501067341",
        publisher: "Record",
        year: 1938,
        category: "Romance",
        copies: 2,
    },
    SeedBook {
        title: "Estruturas de Dados e Algoritmos",
        author: "Nivio Ziviani",
        isbn: "9788522110506",
        publisher: "Cengage",
        year: 2011,
        category: "Computação",
        copies: 1,
    },
    SeedBook {
        title: "Grande Sertão: Veredas",
        author: "João Guimarães Rosa",
        isbn: "9788535908473",
        publisher: "Companhia das Letras",
        year: 1956,
        category: "Romance",
        copies: 2,
    },
];

// (name, email, type, membership number)
const MEMBERS: [(&str, &str, &str, Option<&str>); 3] = [
    ("Ana Souza", "ana.souza@example.org", "aluno", Some("2024001")),
    ("Bruno Lima", "bruno.lima@example.org", "professor", None),
    ("Carla Dias", "carla.dias@example.org", "funcionario", Some("F-0042")),
];

/// Insert demo books and members; existing rows (same ISBN/email) are left alone.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    for seed in BOOKS {
        let model = book::ActiveModel {
            title: Set(seed.title.to_owned()),
            author: Set(seed.author.to_owned()),
            isbn: Set(Some(seed.isbn.to_owned())),
            publisher: Set(Some(seed.publisher.to_owned())),
            publication_year: Set(Some(seed.year)),
            category: Set(Some(seed.category.to_owned())),
            total_copies: Set(seed.copies),
            available_copies: Set(seed.copies),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };

        book::Entity::insert(model)
            .on_conflict(
                sea_query::OnConflict::column(book::Column::Isbn)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(db)
            .await?;
    }

    for (name, email, member_type, number) in MEMBERS {
        let model = member::ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            phone: Set(None),
            member_type: Set(member_type.to_owned()),
            membership_number: Set(number.map(str::to_owned)),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };

        member::Entity::insert(model)
            .on_conflict(
                sea_query::OnConflict::column(member::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(db)
            .await?;
    }

    tracing::info!(
        books = BOOKS.len(),
        members = MEMBERS.len(),
        "Demo data ensured"
    );
    Ok(())
}
