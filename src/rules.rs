// src/rules.rs

//! Pré-condições de cada escrita e efeitos em cascata das transições.
//!
//! Todas as funções recebem a transação aberta pelo serviço. Uma checagem que
//! falha devolve o erro e o serviço descarta a transação, então nada é gravado.
//! Ordem fixa por operação: permissão, existência, unicidade,
//! disponibilidade/estado, dependentes e só então a escrita.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StoreTx,
    models::{
        animal::{Animal, AnimalStatus},
        auth::Caller,
        entity::{EntityKind, UniqueField},
        registry::TUTOR_ALREADY_EXISTS,
        workflow::{Adoption, AdoptionStatus, Complaint, ComplaintStatus, Donation, DonationStatus, WorkflowStatus},
    },
};

// --- PERMISSÕES ---

pub fn require_admin(caller: &Caller) -> Result<(), AppError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub fn require_self_or_admin(caller: &Caller, owner: Uuid) -> Result<(), AppError> {
    if caller.is_admin() || caller.user_id == owner {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

// --- EXISTÊNCIA ---

/// Converte a leitura de um registro em `NotFound` quando ele não existe.
pub fn found<T>(row: Option<T>, kind: EntityKind) -> Result<T, AppError> {
    row.ok_or_else(|| AppError::NotFound(kind.not_found_message()))
}

pub async fn require_exists(tx: &mut dyn StoreTx, kind: EntityKind, id: Uuid) -> Result<(), AppError> {
    if tx.exists(kind, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(kind.not_found_message()))
    }
}

// Referência opcional: ausente passa direto
pub async fn require_exists_if_some(
    tx: &mut dyn StoreTx,
    kind: EntityKind,
    id: Option<Uuid>,
) -> Result<(), AppError> {
    match id {
        Some(id) => require_exists(tx, kind, id).await,
        None => Ok(()),
    }
}

// --- UNICIDADE ---

/// Falha com `Conflict` se outro registro já usa `value`.
/// `exclude` é o próprio registro numa edição.
pub async fn require_unique(
    tx: &mut dyn StoreTx,
    field: UniqueField,
    value: &str,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    match tx.find_id_by_unique(field, value).await? {
        Some(owner) if Some(owner) != exclude => {
            tracing::warn!(?field, value, "Valor único já em uso");
            Err(match field {
                UniqueField::UserEmail => AppError::EmailAlreadyExists,
                _ => AppError::Conflict(field.conflict_message()),
            })
        }
        _ => Ok(()),
    }
}

pub async fn require_no_existing_tutor(tx: &mut dyn StoreTx, user_id: Uuid) -> Result<(), AppError> {
    if tx.find_tutor_by_user(user_id).await?.is_some() {
        tracing::warn!(%user_id, "Usuário já possui perfil de tutor");
        return Err(AppError::Conflict(TUTOR_ALREADY_EXISTS.to_string()));
    }
    Ok(())
}

// --- DISPONIBILIDADE ---

/// Trava o animal e exige que esteja DISPONIVEL.
///
/// A trava vale até o fim da transação, então duas adoções simultâneas do
/// mesmo animal não passam juntas por esta checagem com dados velhos.
pub async fn require_animal_available(tx: &mut dyn StoreTx, animal_id: Uuid) -> Result<Animal, AppError> {
    let animal = found(tx.lock_animal(animal_id).await?, EntityKind::Animal)?;
    if animal.status != AnimalStatus::Disponivel {
        tracing::warn!(%animal_id, status = animal.status.as_str(), "Adoção recusada");
        return Err(AppError::BadRequest("Animal não está disponível para adoção".to_string()));
    }
    Ok(animal)
}

// --- DEPENDENTES ---

/// A operação que o guard de dependentes está protegendo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guarded {
    Update,
    Delete,
}

impl Guarded {
    fn verb(self) -> &'static str {
        match self {
            Guarded::Update => "editar",
            Guarded::Delete => "deletar",
        }
    }
}

/// Falha com `BadRequest` no primeiro tipo de `dependents` que ainda aponta para `id`.
pub async fn require_no_dependents(
    tx: &mut dyn StoreTx,
    kind: EntityKind,
    id: Uuid,
    op: Guarded,
    dependents: &[EntityKind],
) -> Result<(), AppError> {
    for &dependent in dependents {
        let linked = tx.count_referencing(dependent, kind, id).await?;
        if linked > 0 {
            tracing::warn!(?kind, %id, ?dependent, linked, "Operação bloqueada por dependentes");
            return Err(AppError::BadRequest(format!(
                "Não é possível {} {} que possui {}",
                op.verb(),
                kind.label(),
                dependent.linked_plural()
            )));
        }
    }
    Ok(())
}

// --- TRANSIÇÕES DE STATUS ---

fn invalid_transition(kind: EntityKind, from: &str, to: &str) -> AppError {
    tracing::warn!(?kind, from, to, "Transição de status recusada");
    AppError::BadRequest(format!("Transição de status inválida para {}: {} → {}", kind.label(), from, to))
}

/// `Ok(true)` se há algo a gravar, `Ok(false)` quando o status se repete.
pub fn check_transition<S: WorkflowStatus>(kind: EntityKind, current: S, next: S) -> Result<bool, AppError> {
    if current == next {
        return Ok(false);
    }
    if !current.can_transition_to(next) {
        return Err(invalid_transition(kind, current.as_str(), next.as_str()));
    }
    Ok(true)
}

/// Mudança de status pela edição direta do animal.
pub fn check_animal_transition(current: AnimalStatus, next: AnimalStatus) -> Result<(), AppError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(invalid_transition(EntityKind::Animal, current.as_str(), next.as_str()))
    }
}

/// Aprovar ou concluir marca o animal como ADOTADO na mesma transação,
/// antes de gravar a adoção.
pub async fn transition_adoption(
    tx: &mut dyn StoreTx,
    id: Uuid,
    next: AdoptionStatus,
) -> Result<Adoption, AppError> {
    let adoption = found(tx.get_adoption(id).await?, EntityKind::Adoption)?;
    if !check_transition(EntityKind::Adoption, adoption.status, next)? {
        return Ok(adoption);
    }

    if next.marks_animal_adopted() {
        let animal = found(tx.lock_animal(adoption.animal_id).await?, EntityKind::Animal)?;

        // APROVADA → CONCLUIDA segue com o mesmo pedido; fora isso, um único
        // pedido aprovado ou concluído por animal.
        if !adoption.status.marks_animal_adopted() {
            let taken = tx
                .list_adoptions_by_animal(animal.id)
                .await?
                .iter()
                .any(|other| other.id != id && other.status.marks_animal_adopted());
            if taken {
                tracing::warn!(animal_id = %animal.id, adoption_id = %id, "Animal já adotado por outro pedido");
                return Err(AppError::BadRequest("Animal já foi adotado em outro pedido".to_string()));
            }
        }

        if animal.status != AnimalStatus::Adotado {
            tx.set_animal_status(animal.id, AnimalStatus::Adotado).await?;
            tracing::info!(animal_id = %animal.id, adoption_id = %id, "Animal marcado como ADOTADO");
        }
    }

    tx.set_adoption_status(id, next).await
}

pub async fn transition_donation(
    tx: &mut dyn StoreTx,
    id: Uuid,
    next: DonationStatus,
) -> Result<Donation, AppError> {
    let donation = found(tx.get_donation(id).await?, EntityKind::Donation)?;
    if !check_transition(EntityKind::Donation, donation.status, next)? {
        return Ok(donation);
    }
    tx.set_donation_status(id, next).await
}

pub async fn transition_complaint(
    tx: &mut dyn StoreTx,
    id: Uuid,
    next: ComplaintStatus,
) -> Result<Complaint, AppError> {
    let complaint = found(tx.get_complaint(id).await?, EntityKind::Complaint)?;
    if !check_transition(EntityKind::Complaint, complaint.status, next)? {
        return Ok(complaint);
    }
    tx.set_complaint_status(id, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{MemoryStore, Store},
        models::{
            animal::CreateAnimalPayload,
            auth::Role,
            clinic::CreateConsultationPayload,
            workflow::CreateAdoptionPayload,
        },
        testutils::{animal_payload, city_payload, institution_payload, new_user, tutor_payload, vet_payload},
    };
    use chrono::Utc;

    async fn open() -> (MemoryStore, Box<dyn StoreTx>) {
        let store = MemoryStore::new();
        let tx = store.begin().await.unwrap();
        (store, tx)
    }

    #[test]
    fn admin_passes_every_capability_check() {
        let admin = Caller { user_id: Uuid::new_v4(), role: Role::Admin };
        assert!(require_admin(&admin).is_ok());
        assert!(require_self_or_admin(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn regular_user_is_limited_to_own_records() {
        let user = Caller { user_id: Uuid::new_v4(), role: Role::User };
        assert!(matches!(require_admin(&user), Err(AppError::Forbidden)));
        assert!(require_self_or_admin(&user, user.user_id).is_ok());
        assert!(matches!(require_self_or_admin(&user, Uuid::new_v4()), Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn missing_reference_is_not_found_with_kind_message() {
        let (_store, mut tx) = open().await;
        let err = require_exists(&mut *tx, EntityKind::Veterinarian, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Veterinário não encontrado"));
        assert!(require_exists_if_some(&mut *tx, EntityKind::Tutor, None).await.is_ok());
    }

    #[tokio::test]
    async fn uniqueness_ignores_the_record_being_edited() {
        let (_store, mut tx) = open().await;
        let inst = tx.insert_institution(&institution_payload("12345678000190")).await.unwrap();

        let err = require_unique(&mut *tx, UniqueField::InstitutionCnpj, "12345678000190", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "CNPJ já cadastrado"));

        require_unique(&mut *tx, UniqueField::InstitutionCnpj, "12345678000190", Some(inst.id))
            .await
            .unwrap();
        require_unique(&mut *tx, UniqueField::InstitutionCnpj, "99999999000199", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn only_available_animals_can_be_adopted() {
        let (_store, mut tx) = open().await;
        let rex = tx.insert_animal(&animal_payload("Rex")).await.unwrap();
        let mia = tx
            .insert_animal(&CreateAnimalPayload {
                status: Some(AnimalStatus::EmTratamento),
                ..animal_payload("Mia")
            })
            .await
            .unwrap();

        assert_eq!(require_animal_available(&mut *tx, rex.id).await.unwrap().id, rex.id);
        let err = require_animal_available(&mut *tx, mia.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Animal não está disponível para adoção"));
        let err = require_animal_available(&mut *tx, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn dependents_block_and_name_the_dependency() {
        let (_store, mut tx) = open().await;
        let city = tx.insert_city(&city_payload()).await.unwrap();
        let vet = tx.insert_veterinarian(&vet_payload("SP-12345", city.id)).await.unwrap();
        let rex = tx.insert_animal(&animal_payload("Rex")).await.unwrap();

        let deps = [EntityKind::Consultation, EntityKind::Surgery];
        require_no_dependents(&mut *tx, EntityKind::Animal, rex.id, Guarded::Delete, &deps)
            .await
            .unwrap();

        tx.insert_consultation(&CreateConsultationPayload {
            date: Utc::now(),
            animal_id: rex.id,
            veterinarian_id: vet.id,
            tutor_id: None,
            description: None,
        })
        .await
        .unwrap();

        let err = require_no_dependents(&mut *tx, EntityKind::Animal, rex.id, Guarded::Delete, &deps)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(ref m) if m == "Não é possível deletar animal que possui consultas vinculadas"
        ));

        let err = require_no_dependents(
            &mut *tx,
            EntityKind::City,
            city.id,
            Guarded::Update,
            &[EntityKind::Tutor, EntityKind::Veterinarian],
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(ref m) if m == "Não é possível editar cidade que possui veterinários vinculados"
        ));
    }

    #[tokio::test]
    async fn one_tutor_profile_per_user() {
        let (_store, mut tx) = open().await;
        let user = tx.insert_user(&new_user("ana@helppet.com", Role::User)).await.unwrap();
        let city = tx.insert_city(&city_payload()).await.unwrap();

        require_no_existing_tutor(&mut *tx, user.id).await.unwrap();
        tx.insert_tutor(user.id, &tutor_payload(city.id)).await.unwrap();
        let err = require_no_existing_tutor(&mut *tx, user.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == TUTOR_ALREADY_EXISTS));
    }

    #[test]
    fn repeated_status_is_a_no_op_and_backwards_moves_fail() {
        assert!(!check_transition(EntityKind::Adoption, AdoptionStatus::Aprovada, AdoptionStatus::Aprovada).unwrap());
        assert!(check_transition(EntityKind::Adoption, AdoptionStatus::Pendente, AdoptionStatus::Aprovada).unwrap());
        let err = check_transition(EntityKind::Adoption, AdoptionStatus::Aprovada, AdoptionStatus::Rejeitada)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("APROVADA") && m.contains("REJEITADA")));

        assert!(check_animal_transition(AnimalStatus::Disponivel, AnimalStatus::EmTratamento).is_ok());
        assert!(check_animal_transition(AnimalStatus::Adotado, AnimalStatus::Disponivel).is_err());
    }

    #[tokio::test]
    async fn approving_adoption_marks_animal_adopted_once() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let user = tx.insert_user(&new_user("joao@helppet.com", Role::User)).await.unwrap();
        let rex = tx.insert_animal(&animal_payload("Rex")).await.unwrap();
        let adoption = tx
            .insert_adoption(user.id, &CreateAdoptionPayload { animal_id: rex.id, observations: None })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let approved = transition_adoption(&mut *tx, adoption.id, AdoptionStatus::Aprovada).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(approved.status, AdoptionStatus::Aprovada);

        let mut tx = store.begin().await.unwrap();
        let adopted = tx.get_animal(rex.id).await.unwrap().unwrap();
        assert_eq!(adopted.status, AnimalStatus::Adotado);

        // Repetir não regrava nem o animal nem a adoção
        let again = transition_adoption(&mut *tx, adoption.id, AdoptionStatus::Aprovada).await.unwrap();
        assert_eq!(again.updated_at, approved.updated_at);
        assert_eq!(tx.get_animal(rex.id).await.unwrap().unwrap().updated_at, adopted.updated_at);
    }

    #[tokio::test]
    async fn rejecting_adoption_leaves_animal_available() {
        let (_store, mut tx) = open().await;
        let user = tx.insert_user(&new_user("joao@helppet.com", Role::User)).await.unwrap();
        let rex = tx.insert_animal(&animal_payload("Rex")).await.unwrap();
        let adoption = tx
            .insert_adoption(user.id, &CreateAdoptionPayload { animal_id: rex.id, observations: None })
            .await
            .unwrap();

        transition_adoption(&mut *tx, adoption.id, AdoptionStatus::Rejeitada).await.unwrap();
        let rex = tx.get_animal(rex.id).await.unwrap().unwrap();
        assert_eq!(rex.status, AnimalStatus::Disponivel);
    }

    #[tokio::test]
    async fn failed_cascade_rolls_back_with_the_transaction() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let user = tx.insert_user(&new_user("joao@helppet.com", Role::User)).await.unwrap();
        let rex = tx.insert_animal(&animal_payload("Rex")).await.unwrap();
        let adoption = tx
            .insert_adoption(user.id, &CreateAdoptionPayload { animal_id: rex.id, observations: None })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            transition_adoption(&mut *tx, adoption.id, AdoptionStatus::Concluida).await.unwrap();
            // descartada sem commit
        }

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.get_animal(rex.id).await.unwrap().unwrap().status, AnimalStatus::Disponivel);
        assert_eq!(
            tx.get_adoption(adoption.id).await.unwrap().unwrap().status,
            AdoptionStatus::Pendente
        );
    }

    #[tokio::test]
    async fn missing_workflow_record_is_not_found() {
        let (_store, mut tx) = open().await;
        let err = transition_donation(&mut *tx, Uuid::new_v4(), DonationStatus::Confirmada)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Doação não encontrada"));
        let err = transition_complaint(&mut *tx, Uuid::new_v4(), ComplaintStatus::Resolvida)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Denúncia não encontrada"));
    }
}
