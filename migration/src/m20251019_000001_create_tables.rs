use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::ActiveSessionId).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 比赛表
        manager
            .create_table(
                Table::create()
                    .table(Contests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contests::Name).string().not_null())
                    .col(ColumnDef::new(Contests::ImageUrl).string().null())
                    .col(ColumnDef::new(Contests::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 选手表
        manager
            .create_table(
                Table::create()
                    .table(Candidates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Candidates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Candidates::ContestId).big_integer().not_null())
                    .col(ColumnDef::new(Candidates::Name).string().not_null())
                    .col(
                        ColumnDef::new(Candidates::CandidateNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Candidates::ImageUrl).string().null())
                    .col(ColumnDef::new(Candidates::DisplayOrder).integer().null())
                    .col(
                        ColumnDef::new(Candidates::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(Candidates::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Candidates::Table, Candidates::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 环节表
        manager
            .create_table(
                Table::create()
                    .table(Segments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Segments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Segments::ContestId).big_integer().not_null())
                    .col(ColumnDef::new(Segments::Name).string().not_null())
                    .col(ColumnDef::new(Segments::Percentage).double().not_null())
                    .col(
                        ColumnDef::new(Segments::SegmentType)
                            .string()
                            .not_null()
                            .default("judge"),
                    )
                    .col(
                        ColumnDef::new(Segments::Status)
                            .string()
                            .not_null()
                            .default("closed"),
                    )
                    .col(ColumnDef::new(Segments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Segments::Table, Segments::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 评分标准表
        manager
            .create_table(
                Table::create()
                    .table(Criteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Criteria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Criteria::SegmentId).big_integer().not_null())
                    .col(ColumnDef::new(Criteria::Name).string().not_null())
                    .col(ColumnDef::new(Criteria::MaxScore).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Criteria::Table, Criteria::SegmentId)
                            .to(Segments::Table, Segments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 评委评分表
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scores::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scores::JudgeId).big_integer().not_null())
                    .col(ColumnDef::new(Scores::CandidateId).big_integer().not_null())
                    .col(ColumnDef::new(Scores::CriterionId).big_integer().not_null())
                    .col(ColumnDef::new(Scores::SegmentId).big_integer().not_null())
                    .col(ColumnDef::new(Scores::ContestId).big_integer().not_null())
                    .col(ColumnDef::new(Scores::Score).double().not_null())
                    .col(ColumnDef::new(Scores::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::JudgeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::CriterionId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::SegmentId)
                            .to(Segments::Table, Segments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 管理员评分表
        manager
            .create_table(
                Table::create()
                    .table(AdminScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminScores::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminScores::CandidateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminScores::SegmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminScores::ContestId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminScores::Score).double().not_null())
                    .col(
                        ColumnDef::new(AdminScores::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdminScores::Table, AdminScores::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdminScores::Table, AdminScores::SegmentId)
                            .to(Segments::Table, Segments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdminScores::Table, AdminScores::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_candidates_contest_number")
                    .table(Candidates::Table)
                    .col(Candidates::ContestId)
                    .col(Candidates::CandidateNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 同一评委对同一选手同一标准只能有一条评分，作为重复提交的最终防线
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_scores_judge_candidate_criterion")
                    .table(Scores::Table)
                    .col(Scores::JudgeId)
                    .col(Scores::CandidateId)
                    .col(Scores::CriterionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_admin_scores_candidate_segment")
                    .table(AdminScores::Table)
                    .col(AdminScores::CandidateId)
                    .col(AdminScores::SegmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scores_judge_segment")
                    .table(Scores::Table)
                    .col(Scores::JudgeId)
                    .col(Scores::SegmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scores_contest_id")
                    .table(Scores::Table)
                    .col(Scores::ContestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_segments_contest_id")
                    .table(Segments::Table)
                    .col(Segments::ContestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_criteria_segment_id")
                    .table(Criteria::Table)
                    .col(Criteria::SegmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(AdminScores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Criteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Segments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Candidates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    ActiveSessionId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contests {
    #[sea_orm(iden = "contests")]
    Table,
    Id,
    Name,
    ImageUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Candidates {
    #[sea_orm(iden = "candidates")]
    Table,
    Id,
    ContestId,
    Name,
    CandidateNumber,
    ImageUrl,
    DisplayOrder,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Segments {
    #[sea_orm(iden = "segments")]
    Table,
    Id,
    ContestId,
    Name,
    Percentage,
    SegmentType,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Criteria {
    #[sea_orm(iden = "criteria")]
    Table,
    Id,
    SegmentId,
    Name,
    MaxScore,
}

#[derive(DeriveIden)]
enum Scores {
    #[sea_orm(iden = "scores")]
    Table,
    Id,
    JudgeId,
    CandidateId,
    CriterionId,
    SegmentId,
    ContestId,
    Score,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdminScores {
    #[sea_orm(iden = "admin_scores")]
    Table,
    Id,
    CandidateId,
    SegmentId,
    ContestId,
    Score,
    UpdatedAt,
}
