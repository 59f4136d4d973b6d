// src/models/entity.rs

// Metadados compartilhados pelo store e pela camada de regras:
// quais tipos de registro existem, quais campos são únicos e quem referencia quem.

/// Os tipos de registro guardados no store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    City,
    Institution,
    Animal,
    Tutor,
    Veterinarian,
    Consultation,
    Surgery,
    Adoption,
    Donation,
    Complaint,
}

impl EntityKind {
    /// Nome da tabela no Postgres.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::City => "cities",
            EntityKind::Institution => "institutions",
            EntityKind::Animal => "animals",
            EntityKind::Tutor => "tutors",
            EntityKind::Veterinarian => "veterinarians",
            EntityKind::Consultation => "consultations",
            EntityKind::Surgery => "surgeries",
            EntityKind::Adoption => "adoptions",
            EntityKind::Donation => "donations",
            EntityKind::Complaint => "complaints",
        }
    }

    /// Nome usado nas mensagens ("deletar animal", "editar cidade").
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::User => "usuário",
            EntityKind::City => "cidade",
            EntityKind::Institution => "instituição",
            EntityKind::Animal => "animal",
            EntityKind::Tutor => "tutor",
            EntityKind::Veterinarian => "veterinário",
            EntityKind::Consultation => "consulta",
            EntityKind::Surgery => "cirurgia",
            EntityKind::Adoption => "adoção",
            EntityKind::Donation => "doação",
            EntityKind::Complaint => "denúncia",
        }
    }

    /// Forma plural já concordando com "vinculados/vinculadas".
    pub fn linked_plural(self) -> &'static str {
        match self {
            EntityKind::User => "usuários vinculados",
            EntityKind::City => "cidades vinculadas",
            EntityKind::Institution => "instituições vinculadas",
            EntityKind::Animal => "animais vinculados",
            EntityKind::Tutor => "tutores vinculados",
            EntityKind::Veterinarian => "veterinários vinculados",
            EntityKind::Consultation => "consultas vinculadas",
            EntityKind::Surgery => "cirurgias vinculadas",
            EntityKind::Adoption => "adoções vinculadas",
            EntityKind::Donation => "doações vinculadas",
            EntityKind::Complaint => "denúncias vinculadas",
        }
    }

    pub fn not_found_message(self) -> String {
        match self {
            EntityKind::User => "Usuário não encontrado".to_string(),
            EntityKind::City => "Cidade não encontrada".to_string(),
            EntityKind::Institution => "Instituição não encontrada".to_string(),
            EntityKind::Animal => "Animal não encontrado".to_string(),
            EntityKind::Tutor => "Tutor não encontrado".to_string(),
            EntityKind::Veterinarian => "Veterinário não encontrado".to_string(),
            EntityKind::Consultation => "Consulta não encontrada".to_string(),
            EntityKind::Surgery => "Cirurgia não encontrada".to_string(),
            EntityKind::Adoption => "Adoção não encontrada".to_string(),
            EntityKind::Donation => "Doação não encontrada".to_string(),
            EntityKind::Complaint => "Denúncia não encontrada".to_string(),
        }
    }
}

/// Mensagem para remoção bloqueada por referência obrigatória.
pub const LINKED_RECORDS: &str = "Não é possível remover: existem registros vinculados";

/// Campos com restrição de unicidade global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    UserEmail,
    InstitutionCnpj,
    VeterinarianCrmv,
}

impl UniqueField {
    pub fn kind(self) -> EntityKind {
        match self {
            UniqueField::UserEmail => EntityKind::User,
            UniqueField::InstitutionCnpj => EntityKind::Institution,
            UniqueField::VeterinarianCrmv => EntityKind::Veterinarian,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            UniqueField::UserEmail => "email",
            UniqueField::InstitutionCnpj => "cnpj",
            UniqueField::VeterinarianCrmv => "crmv",
        }
    }

    pub fn conflict_message(self) -> String {
        match self {
            UniqueField::UserEmail => "Este e-mail já está em uso.".to_string(),
            UniqueField::InstitutionCnpj => "CNPJ já cadastrado".to_string(),
            UniqueField::VeterinarianCrmv => "CRMV já cadastrado".to_string(),
        }
    }
}

/// Uma chave estrangeira: `dependent.column` aponta para `target.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub dependent: EntityKind,
    pub column: &'static str,
    pub target: EntityKind,
    /// Referências opcionais viram NULL quando o alvo some; as obrigatórias bloqueiam a remoção.
    pub optional: bool,
}

const fn relation(
    dependent: EntityKind,
    column: &'static str,
    target: EntityKind,
    optional: bool,
) -> Relation {
    Relation { dependent, column, target, optional }
}

pub const RELATIONS: &[Relation] = &[
    relation(EntityKind::Tutor, "user_id", EntityKind::User, false),
    relation(EntityKind::Tutor, "city_id", EntityKind::City, false),
    relation(EntityKind::Veterinarian, "city_id", EntityKind::City, false),
    relation(EntityKind::Animal, "tutor_id", EntityKind::Tutor, true),
    relation(EntityKind::Animal, "institution_id", EntityKind::Institution, true),
    relation(EntityKind::Consultation, "animal_id", EntityKind::Animal, false),
    relation(EntityKind::Consultation, "veterinarian_id", EntityKind::Veterinarian, false),
    relation(EntityKind::Consultation, "tutor_id", EntityKind::Tutor, true),
    relation(EntityKind::Surgery, "animal_id", EntityKind::Animal, false),
    relation(EntityKind::Surgery, "veterinarian_id", EntityKind::Veterinarian, false),
    relation(EntityKind::Adoption, "user_id", EntityKind::User, false),
    relation(EntityKind::Adoption, "animal_id", EntityKind::Animal, false),
    relation(EntityKind::Donation, "user_id", EntityKind::User, false),
    relation(EntityKind::Donation, "institution_id", EntityKind::Institution, false),
    relation(EntityKind::Complaint, "user_id", EntityKind::User, false),
    relation(EntityKind::Complaint, "tutor_id", EntityKind::Tutor, false),
];

/// Todas as relações em que `dependent` aponta para `target`.
pub fn relations_between(
    dependent: EntityKind,
    target: EntityKind,
) -> impl Iterator<Item = &'static Relation> {
    RELATIONS
        .iter()
        .filter(move |r| r.dependent == dependent && r.target == target)
}

/// Todas as relações que apontam para `target`.
pub fn relations_to(target: EntityKind) -> impl Iterator<Item = &'static Relation> {
    RELATIONS.iter().filter(move |r| r.target == target)
}
