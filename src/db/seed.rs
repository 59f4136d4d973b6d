// src/db/seed.rs

//! Dados de demonstração para desenvolvimento (`SEED_DEMO=true`).

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        animal::{AnimalStatus, CreateAnimalPayload},
        entity::UniqueField,
        registry::{CreateCityPayload, CreateInstitutionPayload, CreateVeterinarianPayload},
    },
};

// A primeira instituição marca que o seed já rodou
const MARKER_CNPJ: &str = "12345678000190";

fn institution(name: &str, cnpj: &str, address: &str, phone: &str, city: &str, state: &str, description: &str) -> CreateInstitutionPayload {
    CreateInstitutionPayload {
        name: name.to_string(),
        cnpj: cnpj.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        description: Some(description.to_string()),
    }
}

fn dog(name: &str, breed: &str, age: i32, weight: Decimal, description: &str) -> CreateAnimalPayload {
    CreateAnimalPayload {
        name: name.to_string(),
        species: "Cão".to_string(),
        breed: Some(breed.to_string()),
        age: Some(age),
        weight: Some(weight),
        description: Some(description.to_string()),
        status: None,
        photo: None,
        tutor_id: None,
        institution_id: None,
    }
}

/// Cidades, instituições, animais e veterinários de exemplo. Roda uma vez só:
/// se a instituição de referência já existe, nada é gravado.
pub async fn seed_demo(store: &dyn Store) -> Result<(), AppError> {
    let mut tx = store.begin().await?;
    if tx.find_id_by_unique(UniqueField::InstitutionCnpj, MARKER_CNPJ).await?.is_some() {
        tracing::info!("Dados de demonstração já presentes");
        return Ok(());
    }

    let sao_paulo = tx
        .insert_city(&CreateCityPayload { name: "São Paulo".to_string(), state: "SP".to_string() })
        .await?;
    let rio = tx
        .insert_city(&CreateCityPayload { name: "Rio de Janeiro".to_string(), state: "RJ".to_string() })
        .await?;

    let amigo_fiel = tx
        .insert_institution(&institution(
            "Clínica Amigo Fiel",
            MARKER_CNPJ,
            "Rua dos Animais, 123",
            "(11) 98765-4321",
            "São Paulo",
            "SP",
            "Clínica especializada em reabilitação de cães abandonados",
        ))
        .await?;
    let peludos = tx
        .insert_institution(&institution(
            "Casa dos Peludos",
            "98765432000110",
            "Av. Pet, 456",
            "(21) 91234-5678",
            "Rio de Janeiro",
            "RJ",
            "Abrigo e clínica veterinária para animais em situação de rua",
        ))
        .await?;

    let animals = [
        CreateAnimalPayload {
            institution_id: Some(amigo_fiel.id),
            ..dog("Rex", "Vira-lata", 2, Decimal::new(155, 1), "Cão muito dócil e brincalhão, castrado e vacinado")
        },
        CreateAnimalPayload {
            institution_id: Some(amigo_fiel.id),
            ..dog("Luna", "Golden Retriever", 1, Decimal::new(20, 0), "Fêmea muito carinhosa, ideal para família com crianças")
        },
        CreateAnimalPayload {
            status: Some(AnimalStatus::EmTratamento),
            institution_id: Some(peludos.id),
            ..dog("Thor", "Pastor Alemão", 3, Decimal::new(30, 0), "Cão grande e protetor, precisa de espaço")
        },
    ];
    for animal in &animals {
        tx.insert_animal(animal).await?;
    }

    for (name, crmv, city_id, phone, specialty) in [
        ("Dr. João Silva", "SP-12345", sao_paulo.id, "(11) 99876-5432", "Clínica Geral"),
        ("Dra. Maria Santos", "RJ-67890", rio.id, "(21) 98765-4321", "Cirurgia"),
    ] {
        tx.insert_veterinarian(&CreateVeterinarianPayload {
            name: name.to_string(),
            crmv: crmv.to_string(),
            city_id,
            phone: phone.to_string(),
            specialty: Some(specialty.to_string()),
        })
        .await?;
    }

    tx.commit().await?;
    tracing::info!("🌱 Dados de demonstração criados");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::MemoryStore, models::entity::EntityKind};

    #[tokio::test]
    async fn demo_data_is_created_once() {
        let store = MemoryStore::new();
        seed_demo(&store).await.unwrap();
        seed_demo(&store).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.count(EntityKind::City).await.unwrap(), 2);
        assert_eq!(tx.count(EntityKind::Institution).await.unwrap(), 2);
        assert_eq!(tx.count(EntityKind::Veterinarian).await.unwrap(), 2);
        assert_eq!(tx.count_with_status(EntityKind::Animal, "DISPONIVEL").await.unwrap(), 2);
        assert_eq!(tx.count_with_status(EntityKind::Animal, "EM_TRATAMENTO").await.unwrap(), 1);
    }
}
