use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 奖项表，奖项不隶属于任何比赛
        manager
            .create_table(
                Table::create()
                    .table(Awards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Awards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Awards::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Awards::AwardType).string().not_null())
                    .col(ColumnDef::new(Awards::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 获奖者表
        manager
            .create_table(
                Table::create()
                    .table(AwardWinners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AwardWinners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AwardWinners::AwardId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AwardWinners::CandidateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AwardWinners::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AwardWinners::Table, AwardWinners::AwardId)
                            .to(Awards::Table, Awards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AwardWinners::Table, AwardWinners::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个奖项只有一名获奖者，重新指定即覆盖
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_award_winners_award")
                    .table(AwardWinners::Table)
                    .col(AwardWinners::AwardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AwardWinners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Awards::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Awards {
    #[sea_orm(iden = "awards")]
    Table,
    Id,
    Name,
    AwardType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AwardWinners {
    #[sea_orm(iden = "award_winners")]
    Table,
    Id,
    AwardId,
    CandidateId,
    AssignedAt,
}

#[derive(DeriveIden)]
enum Candidates {
    #[sea_orm(iden = "candidates")]
    Table,
    Id,
}
