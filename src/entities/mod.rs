//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod accountant;
pub mod cancelled_hours_worked;
pub mod company;
pub mod company_work_invite;
pub mod cooperation;
pub mod coordination_tenure;
pub mod coordination_transfer_request;
pub mod email;
pub mod job;
pub mod member;
pub mod plan;
pub mod plan_cooperation;
pub mod plan_draft;
pub mod plan_review;
pub mod private_consumption;
pub mod productive_consumption;
pub mod registered_hours_worked;
pub mod social_accounting;
pub mod transfer;
pub mod user;

// Re-export specific types to avoid conflicts
pub use account::{Entity as Account, Model as AccountModel};
pub use accountant::{Entity as Accountant, Model as AccountantModel};
pub use cancelled_hours_worked::{
    Entity as CancelledHoursWorked, Model as CancelledHoursWorkedModel,
};
pub use company::{Entity as Company, Model as CompanyModel};
pub use company_work_invite::{Entity as CompanyWorkInvite, Model as CompanyWorkInviteModel};
pub use cooperation::{Entity as Cooperation, Model as CooperationModel};
pub use coordination_tenure::{Entity as CoordinationTenure, Model as CoordinationTenureModel};
pub use coordination_transfer_request::{
    Entity as CoordinationTransferRequest, Model as CoordinationTransferRequestModel,
};
pub use email::{Entity as Email, Model as EmailModel};
pub use job::{Entity as Job, Model as JobModel};
pub use member::{Entity as Member, Model as MemberModel};
pub use plan::{Entity as Plan, Model as PlanModel};
pub use plan_cooperation::{Entity as PlanCooperation, Model as PlanCooperationModel};
pub use plan_draft::{Entity as PlanDraft, Model as PlanDraftModel};
pub use plan_review::{Entity as PlanReview, Model as PlanReviewModel};
pub use private_consumption::{Entity as PrivateConsumption, Model as PrivateConsumptionModel};
pub use productive_consumption::{
    Entity as ProductiveConsumption, Model as ProductiveConsumptionModel,
};
pub use registered_hours_worked::{
    Entity as RegisteredHoursWorked, Model as RegisteredHoursWorkedModel,
};
pub use social_accounting::{Entity as SocialAccounting, Model as SocialAccountingModel};
pub use transfer::{Entity as Transfer, Model as TransferModel, TransferType};
pub use user::{Entity as User, Model as UserModel};
